//! Session recording and history aggregation.

pub mod recorder;

pub use recorder::{WorkoutRecorder, WorkoutUpdate};
