//! Test support for the table backend
//!
//! Shared by the backend's unit tests and its integration tests: one-time
//! logging setup, unique fixture names and assertions on rejection frames
//! that do not depend on backend types.

pub mod logging;
pub mod problem_frames;
pub mod unique_helpers;
