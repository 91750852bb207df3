//! DTO modules that bridge the screens with a presentation layer.

pub mod dashboard;
pub mod notification;
pub mod payments;
pub mod status;
