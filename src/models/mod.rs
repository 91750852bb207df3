//! Runtime models shared across the crate.

pub mod config;
