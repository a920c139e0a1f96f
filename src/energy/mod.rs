//! Intensity scoring and calorie-expenditure estimation.

pub mod calories;
pub mod intensity;

pub use calories::{CalorieBreakdown, CalorieCalculator, CalorieCalculatorConfig};
pub use intensity::{ActivitySample, IntensityConfig, IntensityModel, MovementPose};
