//! A headless, spring-animated two-state vertical switch.
//!
//! The switch is driven entirely by its host: pointer events go in through
//! [`switch::PointerInput`], frames are ticked with [`switch::VerticalSwitch::advance_animations`],
//! and state changes come out of a [`notifications::Subscription`].

#[macro_use]
extern crate tracing;

pub mod animation;
pub mod input;
pub mod notifications;
pub mod switch;
