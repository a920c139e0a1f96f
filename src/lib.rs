//! # pose-fitness-core
//!
//! Body-motion event detection and energy-expenditure estimation from a
//! live stream of 2D body-landmark coordinates.
//!
//! The crate consumes [`KeypointFrame`]s produced by an external
//! pose-estimation pipeline and produces:
//!
//! - **Motion events**: discrete jumps and full body rotations, detected
//!   with hysteresis thresholds, time-windowed smoothing,
//!   direction-consistency voting, and debounce gating
//! - **Calorie estimates**: a continuously updated expenditure total
//!   derived from activity intensity and a Mifflin-St Jeor basal-metabolic
//!   model
//! - **Workout records**: session-scoped aggregation of detector and
//!   calculator outputs, exposed to an external persistence collaborator
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    pose-fitness-core                     │
//! ├──────────────────────────────────────────────────────────┤
//! │  pose stream ──► JumpDetector ───┐                       │
//! │             └──► RotationDetector┤                       │
//! │                                  ▼                       │
//! │                  IntensityModel ──► CalorieCalculator    │
//! │                                  │                       │
//! │                                  ▼                       │
//! │                  WorkoutRecorder ──► SessionStore        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous and single-owner: each component processes one
//! frame or tick at a time and shares no mutable state with any other.
//! Cross-component aggregation happens only through the engine's tick.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use pose_fitness_core::prelude::*;
//!
//! # fn main() -> pose_fitness_core::Result<()> {
//! let config = WorkoutConfig::builder().build();
//! let mut engine = WorkoutEngine::new(config, Utc::now());
//!
//! engine.start_workout("dance", Utc::now())?;
//!
//! // Feed frames from the pose pipeline and tick the calculator at the
//! // sampling cadence of the caller
//! let frame = KeypointFrame::empty(Utc::now());
//! engine.process_frame(&frame)?;
//! engine.tick(true, MovementPose::Standing, Utc::now())?;
//!
//! let session = engine.end_workout(Utc::now())?;
//! println!("burned {:.1} kcal", session.calories_burned);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod detection;
pub mod domain;
pub mod energy;
pub mod session;

use std::sync::Arc;

use chrono::{DateTime, Utc};

// Re-export main types
pub use domain::{
    events::{
        EventStore, InMemoryEventStore, MotionEvent, RotationDirection, SessionEvent, WorkoutEvent,
    },
    keypoint::{Joint, KeypointFrame, Point2},
    profile::{InMemoryProfileStore, ProfileStore, UserProfile},
    session::{
        InMemorySessionStore, SessionStore, WorkoutSession, WorkoutSessionId, WorkoutStatistics,
    },
};

pub use detection::{
    JumpDetector, JumpDetectorConfig, RotationDetector, RotationDetectorConfig, SampleHistory,
    ScalarSample,
};

pub use energy::{
    ActivitySample, CalorieBreakdown, CalorieCalculator, CalorieCalculatorConfig, IntensityConfig,
    IntensityModel, MovementPose,
};

pub use session::{WorkoutRecorder, WorkoutUpdate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for workout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for workout operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid session-state transition
    #[error("Session error: {0}")]
    Session(String),

    /// External store failure
    #[error("Store error: {0}")]
    Store(String),
}

/// Configuration for the workout engine
#[derive(Debug, Clone, Default)]
pub struct WorkoutConfig {
    /// Jump detector configuration
    pub jump: JumpDetectorConfig,
    /// Rotation detector configuration
    pub rotation: RotationDetectorConfig,
    /// Calorie calculator configuration
    pub calories: CalorieCalculatorConfig,
}

impl WorkoutConfig {
    /// Create a new configuration builder
    pub fn builder() -> WorkoutConfigBuilder {
        WorkoutConfigBuilder::default()
    }
}

/// Builder for [`WorkoutConfig`]
#[derive(Debug, Default)]
pub struct WorkoutConfigBuilder {
    config: WorkoutConfig,
}

impl WorkoutConfigBuilder {
    /// Set the jump detector configuration
    pub fn jump(mut self, jump: JumpDetectorConfig) -> Self {
        self.config.jump = jump;
        self
    }

    /// Set the rotation detector configuration
    pub fn rotation(mut self, rotation: RotationDetectorConfig) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Set the calorie calculator configuration
    pub fn calories(mut self, calories: CalorieCalculatorConfig) -> Self {
        self.config.calories = calories;
        self
    }

    /// Set the minimum upward height change counted as a jump
    pub fn jump_threshold(mut self, threshold: f64) -> Self {
        self.config.jump.jump_threshold = threshold.max(0.0);
        self
    }

    /// Set the accumulated angle counted as a full rotation (radians)
    pub fn full_rotation_threshold(mut self, threshold: f64) -> Self {
        self.config.rotation.full_rotation_threshold_rad = threshold.max(0.0);
        self
    }

    /// Build the configuration
    pub fn build(self) -> WorkoutConfig {
        self.config
    }
}

/// Top-level coordinator owning the detectors, the calculator, and the
/// recorder.
///
/// Explicitly constructed; holds no global state. Frames go to
/// [`process_frame`](Self::process_frame), calculator ticks to
/// [`tick`](Self::tick); all timestamps are supplied by the caller.
pub struct WorkoutEngine {
    jump_detector: JumpDetector,
    rotation_detector: RotationDetector,
    calculator: CalorieCalculator,
    recorder: WorkoutRecorder,
    event_store: Arc<dyn EventStore>,
}

impl WorkoutEngine {
    /// Create an engine with in-memory stores and a default profile
    pub fn new(config: WorkoutConfig, now: DateTime<Utc>) -> Self {
        Self::with_stores(
            config,
            UserProfile::default(),
            Arc::new(InMemoryEventStore::new()),
            None,
            now,
        )
    }

    /// Create an engine wired to caller-supplied collaborators
    pub fn with_stores(
        config: WorkoutConfig,
        profile: UserProfile,
        event_store: Arc<dyn EventStore>,
        session_store: Option<Arc<dyn SessionStore>>,
        now: DateTime<Utc>,
    ) -> Self {
        let recorder = match session_store {
            Some(store) => WorkoutRecorder::with_store(store),
            None => WorkoutRecorder::new(),
        };

        Self {
            jump_detector: JumpDetector::new(config.jump),
            rotation_detector: RotationDetector::new(config.rotation),
            calculator: CalorieCalculator::new(config.calories, profile, now),
            recorder,
            event_store,
        }
    }

    /// Start recording a workout session.
    ///
    /// Resets both detectors and the calculator so counts and totals are
    /// scoped to the new session. Fails when a session is already
    /// recording.
    pub fn start_workout(
        &mut self,
        activity: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<WorkoutSessionId> {
        if self.recorder.is_recording() {
            return Err(Error::Session("a session is already recording".into()));
        }

        self.jump_detector.reset();
        self.rotation_detector.reset();
        self.calculator.reset(now);

        let activity = activity.into();
        let session = self.recorder.start(activity.clone(), now)?;
        let session_id = session.id;

        self.event_store
            .append(WorkoutEvent::Session(SessionEvent::Started {
                session_id,
                activity,
                timestamp: now,
            }))?;
        Ok(session_id)
    }

    /// Process one keypoint frame through both detectors.
    ///
    /// Emitted motion events are appended to the event store and returned.
    /// Frames missing the landmarks a detector needs are skipped by that
    /// detector without error.
    pub fn process_frame(&mut self, frame: &KeypointFrame) -> Result<Vec<MotionEvent>> {
        let mut events = Vec::new();

        if let Some(event) = self.jump_detector.process(frame) {
            events.push(event);
        }
        if let Some(event) = self.rotation_detector.process(frame) {
            events.push(event);
        }

        for event in &events {
            self.event_store
                .append(WorkoutEvent::Motion(event.clone()))?;
        }
        Ok(events)
    }

    /// Run one calculator tick and, while recording, snapshot-merge the
    /// latest values into the active session.
    pub fn tick(
        &mut self,
        is_active: bool,
        pose: MovementPose,
        now: DateTime<Utc>,
    ) -> Result<CalorieBreakdown> {
        let sample = ActivitySample {
            jump_count: self.jump_detector.jump_count(),
            rotation_count: self.rotation_detector.rotation_count(),
            is_active,
            pose,
        };
        self.calculator.update(&sample, now);

        if self.recorder.is_recording() {
            let update = WorkoutUpdate {
                jump_count: sample.jump_count,
                rotation_count: sample.rotation_count,
                calories_burned: self.calculator.total_calories(),
                average_intensity: self.calculator.average_intensity(),
            };
            self.recorder.update(&update, now)?;
        }

        Ok(self.calculator.breakdown())
    }

    /// End the active session, append it to history, and return the sealed
    /// record. Fails when no session is recording.
    pub fn end_workout(&mut self, now: DateTime<Utc>) -> Result<WorkoutSession> {
        let session = self.recorder.end(now)?;

        self.event_store
            .append(WorkoutEvent::Session(SessionEvent::Ended {
                session_id: session.id,
                duration_secs: session.duration_secs,
                calories_burned: session.calories_burned,
                timestamp: now,
            }))?;
        Ok(session)
    }

    /// Discard the active session without recording it. Fails when no
    /// session is recording.
    pub fn cancel_workout(&mut self, now: DateTime<Utc>) -> Result<()> {
        let session = self.recorder.cancel()?;

        self.event_store
            .append(WorkoutEvent::Session(SessionEvent::Cancelled {
                session_id: session.id,
                timestamp: now,
            }))?;
        Ok(())
    }

    /// The jump detector's observable state
    pub fn jump_detector(&self) -> &JumpDetector {
        &self.jump_detector
    }

    /// The rotation detector's observable state
    pub fn rotation_detector(&self) -> &RotationDetector {
        &self.rotation_detector
    }

    /// The calorie calculator's observable state
    pub fn calculator(&self) -> &CalorieCalculator {
        &self.calculator
    }

    /// The session recorder
    pub fn recorder(&self) -> &WorkoutRecorder {
        &self.recorder
    }

    /// Mutable access to the recorder, for history management
    pub fn recorder_mut(&mut self) -> &mut WorkoutRecorder {
        &mut self.recorder
    }

    /// Replace the user profile and write it through to a store
    pub fn save_profile(&mut self, profile: UserProfile, store: &dyn ProfileStore) -> Result<()> {
        self.calculator.save_profile(profile, store)
    }

    /// Aggregate statistics over the recorded history
    pub fn statistics(&self) -> WorkoutStatistics {
        self.recorder.statistics()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, Result, WorkoutConfig, WorkoutConfigBuilder, WorkoutEngine,
        // Domain types
        Joint, KeypointFrame, MotionEvent, Point2, RotationDirection, UserProfile,
        WorkoutEvent, WorkoutSession, WorkoutSessionId, WorkoutStatistics,
        // Detection
        JumpDetector, JumpDetectorConfig, RotationDetector, RotationDetectorConfig,
        // Energy
        ActivitySample, CalorieBreakdown, CalorieCalculator, MovementPose,
        // Sessions & stores
        EventStore, InMemoryEventStore, InMemorySessionStore, SessionStore,
        WorkoutRecorder, WorkoutUpdate,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = WorkoutConfig::builder()
            .jump_threshold(0.1)
            .full_rotation_threshold(6.0)
            .build();

        assert!((config.jump.jump_threshold - 0.1).abs() < f64::EPSILON);
        assert!((config.rotation.full_rotation_threshold_rad - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_clamping() {
        let config = WorkoutConfig::builder().jump_threshold(-1.0).build();
        assert!(config.jump.jump_threshold.abs() < f64::EPSILON);
    }

    #[test]
    fn test_engine_session_lifecycle() {
        let config = WorkoutConfig::default();
        let mut engine = WorkoutEngine::new(config, ts(0));

        engine.start_workout("dance", ts(0)).unwrap();
        assert!(engine.start_workout("dance", ts(1)).is_err());

        engine.tick(true, MovementPose::Standing, ts(1000)).unwrap();
        let session = engine.end_workout(ts(2000)).unwrap();
        assert!((session.duration_secs - 2.0).abs() < 1e-9);

        assert!(engine.end_workout(ts(3000)).is_err());
    }

    #[test]
    fn test_engine_cancel_discards() {
        let mut engine = WorkoutEngine::new(WorkoutConfig::default(), ts(0));

        engine.start_workout("hiit", ts(0)).unwrap();
        engine.cancel_workout(ts(500)).unwrap();
        assert_eq!(engine.statistics().total_workouts, 0);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
