//! Core types for Vitrine.
//!
//! This is an internal crate that holds the animator state machines and the host abstractions they
//! are driven through. All important types are re-exported by Vitrine.

pub mod config;
pub mod counter;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod interpolation;
pub mod listeners;
pub mod scheduler;
pub mod typing;
pub mod viewport;
pub mod visibility;
