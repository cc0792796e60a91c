use super::SwitchState;
use crate::animation::Interpolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What to do when a run settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub run: RunId,
    pub destination: SwitchState,
    /// Whether the change may be published.
    pub notify: bool,
}

/// One in-flight movement of the handle.
///
/// Progress 0 is the resting offset of `origin`, progress 1 the resting offset of `target`.
/// A run is never reused: a new gesture or move replaces it with a fresh one.
#[derive(Debug)]
pub struct AnimationRun {
    pub id: RunId,
    pub origin: SwitchState,
    pub target: SwitchState,
    pub interpolation: Interpolation<Commit>,
}

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub origin: SwitchState,
    pub run: RunId,
    pub delta_y: f64,
    pub velocity_y: f64,
}

impl AnimationRun {
    /// Returns the pending commit, if this run has been told where to settle.
    pub fn commit(&self) -> Option<&Commit> {
        self.interpolation.completion()
    }

    pub fn is_committing(&self) -> bool {
        self.commit().is_some()
    }
}

/// Hands out increasing run ids.
#[derive(Debug, Default)]
pub struct RunIds {
    counter: u64,
}

impl RunIds {
    pub fn next(&mut self) -> RunId {
        self.counter += 1;
        RunId(self.counter)
    }
}
