//! Core engine types and utilities for the kart simulation.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial helpers
//! - Time management (frame delta and fixed timestep)

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec3};
