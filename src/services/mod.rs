//! Screen controllers and the session services they rely on.

pub mod clients;
pub mod dashboard;
pub mod handoff;
pub mod jobs;
pub mod payments;
pub mod screen;
pub mod session;

pub use screen::{ScreenController, ScreenError, ScreenEvent, ScreenState};
