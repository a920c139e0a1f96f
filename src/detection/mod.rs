//! Motion-event detection from streaming keypoint frames.

pub mod history;
pub mod jump;
pub mod rotation;

pub use history::{SampleHistory, ScalarSample};
pub use jump::{JumpDetector, JumpDetectorConfig};
pub use rotation::{RotationDetector, RotationDetectorConfig};
