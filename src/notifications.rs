//! Multicast state-change notifications.
//!
//! Every subscriber gets its own unbounded channel, so values arrive in publish order and are
//! never dropped. Closing the notifier closes every channel; subscribers then drain what is left
//! and observe a single [`Notification::Closed`].

use async_channel::{Receiver, Sender, TryRecvError};

/// An item delivered to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification<T> {
    Changed(T),
    /// The notifier was closed. Delivered exactly once, after all values.
    Closed,
}

#[derive(Debug)]
pub struct Notifier<T> {
    senders: Vec<Sender<T>>,
    is_closed: bool,
}

/// A subscription to a [`Notifier`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: Receiver<T>,
    is_terminated: bool,
}

impl<T: Clone> Notifier<T> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
            is_closed: false,
        }
    }

    pub fn subscribe(&mut self) -> Subscription<T> {
        let (tx, rx) = async_channel::unbounded();
        if self.is_closed {
            tx.close();
        } else {
            self.senders.push(tx);
        }

        Subscription {
            rx,
            is_terminated: false,
        }
    }

    /// Delivers `value` to every live subscriber.
    pub fn publish(&mut self, value: T) {
        if self.is_closed {
            warn!("dropping notification published after close");
            return;
        }

        self.senders.retain(|tx| {
            // Unbounded channels only fail when the receiver is gone.
            tx.try_send(value.clone()).is_ok()
        });
    }

    /// Closes the stream. Idempotent.
    pub fn close(&mut self) {
        if self.is_closed {
            return;
        }

        self.is_closed = true;
        for tx in self.senders.drain(..) {
            tx.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.iter().filter(|tx| !tx.is_closed()).count()
    }
}

impl<T: Clone> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscription<T> {
    /// Returns the next pending item without waiting.
    ///
    /// `None` means nothing is pending right now, or the `Closed` item was already delivered.
    pub fn try_next(&mut self) -> Option<Notification<T>> {
        if self.is_terminated {
            return None;
        }

        match self.rx.try_recv() {
            Ok(value) => Some(Notification::Changed(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.is_terminated = true;
                Some(Notification::Closed)
            }
        }
    }

    /// Waits for the next item.
    ///
    /// Returns `None` only after `Closed` was delivered.
    pub async fn next(&mut self) -> Option<Notification<T>> {
        if self.is_terminated {
            return None;
        }

        match self.rx.recv().await {
            Ok(value) => Some(Notification::Changed(value)),
            Err(_) => {
                self.is_terminated = true;
                Some(Notification::Closed)
            }
        }
    }

    /// Drains every item that is pending right now.
    pub fn drain(&mut self) -> Vec<Notification<T>> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    pub fn is_terminated(&self) -> bool {
        self.is_terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_arrive_in_order_to_every_subscriber() {
        let mut notifier = Notifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.publish(1);
        notifier.publish(2);

        for sub in [&mut a, &mut b] {
            assert_eq!(
                sub.drain(),
                [Notification::Changed(1), Notification::Changed(2)]
            );
        }
    }

    #[test]
    fn close_is_delivered_once_after_values() {
        let mut notifier = Notifier::new();
        let mut sub = notifier.subscribe();
        notifier.publish(7);
        notifier.close();
        notifier.close();

        assert_eq!(sub.try_next(), Some(Notification::Changed(7)));
        assert_eq!(sub.try_next(), Some(Notification::Closed));
        assert_eq!(sub.try_next(), None);
        assert!(sub.is_terminated());
    }

    #[test]
    fn late_subscriber_is_closed_immediately() {
        let mut notifier = Notifier::<u8>::new();
        notifier.close();
        let mut sub = notifier.subscribe();
        assert_eq!(sub.drain(), [Notification::Closed]);
    }

    #[test]
    fn publish_after_close_is_dropped() {
        let mut notifier = Notifier::new();
        let mut sub = notifier.subscribe();
        notifier.close();
        notifier.publish(3);
        assert_eq!(sub.drain(), [Notification::Closed]);
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let mut notifier = Notifier::new();
        let sub = notifier.subscribe();
        let mut kept = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 2);

        drop(sub);
        notifier.publish(1);
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(kept.drain(), [Notification::Changed(1)]);
    }

    #[test]
    fn async_next_sees_close() {
        let mut notifier = Notifier::new();
        let mut sub = notifier.subscribe();
        notifier.publish(5);
        notifier.close();

        let items = block_on(async move {
            let mut items = Vec::new();
            while let Some(item) = sub.next().await {
                items.push(item);
            }
            items
        });
        assert_eq!(items, [Notification::Changed(5), Notification::Closed]);
    }

    fn block_on<F>(fut: F) -> F::Output
    where
        F: std::future::Future + 'static,
        F::Output: 'static,
    {
        let mut event_loop = calloop::EventLoop::<()>::try_new().unwrap();
        let (executor, scheduler) = calloop::futures::executor().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let _ = event_loop
            .handle()
            .insert_source(executor, move |output, _, _| {
                let _ = tx.send(output);
            })
            .unwrap();
        scheduler.schedule(fut).unwrap();
        loop {
            event_loop.dispatch(None, &mut ()).unwrap();
            if let Ok(output) = rx.try_recv() {
                return output;
            }
        }
    }
}
