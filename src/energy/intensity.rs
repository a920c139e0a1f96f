//! Activity intensity scoring from detector outputs.

/// Movement-pose classification supplied by the caller's pose pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementPose {
    /// Squatting
    Squat,
    /// Push-up position
    Pushup,
    /// Plank hold
    Plank,
    /// Standing upright
    Standing,
    /// No confident classification
    #[default]
    Unknown,
}

impl MovementPose {
    /// Base intensity contribution of the pose, in [0, 1]
    pub fn base_intensity(&self) -> f64 {
        match self {
            MovementPose::Squat => 0.6,
            MovementPose::Pushup => 0.7,
            MovementPose::Plank => 0.5,
            MovementPose::Standing => 0.2,
            MovementPose::Unknown => 0.3,
        }
    }
}

/// Detector outputs for one update tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivitySample {
    /// Jumps counted so far this session
    pub jump_count: u32,
    /// Rotations counted so far this session
    pub rotation_count: u32,
    /// Whether the subject is currently active
    pub is_active: bool,
    /// Optional movement-pose classification
    pub pose: MovementPose,
}

impl Default for ActivitySample {
    fn default() -> Self {
        Self {
            jump_count: 0,
            rotation_count: 0,
            is_active: false,
            pose: MovementPose::Unknown,
        }
    }
}

/// Configuration for intensity scoring
#[derive(Debug, Clone)]
pub struct IntensityConfig {
    /// Jump count at which frequency intensity saturates
    pub jumps_at_full_intensity: u32,
    /// Rotation count at which frequency intensity saturates
    pub rotations_at_full_intensity: u32,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            jumps_at_full_intensity: 20,
            rotations_at_full_intensity: 10,
        }
    }
}

/// Maps detector outputs to a normalized [0, 1] intensity score
#[derive(Debug, Clone, Default)]
pub struct IntensityModel {
    config: IntensityConfig,
}

impl IntensityModel {
    /// Create a new intensity model
    pub fn new(config: IntensityConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Instantaneous intensity for one activity sample
    pub fn score(&self, sample: &ActivitySample) -> f64 {
        if !sample.is_active {
            return 0.0;
        }

        let jump_intensity =
            (f64::from(sample.jump_count) / f64::from(self.config.jumps_at_full_intensity)).min(1.0);
        let rotation_intensity = (f64::from(sample.rotation_count)
            / f64::from(self.config.rotations_at_full_intensity))
        .min(1.0);

        let frequency_intensity = jump_intensity.max(rotation_intensity);
        let base_intensity = sample.pose.base_intensity();

        ((base_intensity + frequency_intensity) / 2.0).clamp(0.0, 1.0)
    }
}
