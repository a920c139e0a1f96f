//! Workout session records and aggregate statistics.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unique identifier for a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkoutSessionId(Uuid);

impl WorkoutSessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WorkoutSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkoutSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded workout.
///
/// Mutated exclusively by the owning recorder while it is the active
/// session; sealed once `end_time` is set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkoutSession {
    /// Session identity
    pub id: WorkoutSessionId,
    /// Activity-type label (free-form, caller-defined)
    pub activity: String,
    /// When recording started
    pub start_time: DateTime<Utc>,
    /// When recording ended; `None` while active
    pub end_time: Option<DateTime<Utc>>,
    /// Jumps counted over the session
    pub jump_count: u32,
    /// Rotations counted over the session
    pub rotation_count: u32,
    /// Calories accumulated over the session (kcal)
    pub calories_burned: f64,
    /// Mean intensity over the session, in [0, 1]
    pub average_intensity: f64,
    /// Elapsed duration in seconds
    pub duration_secs: f64,
}

impl WorkoutSession {
    /// Create a fresh session starting now
    pub fn new(activity: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: WorkoutSessionId::new(),
            activity: activity.into(),
            start_time,
            end_time: None,
            jump_count: 0,
            rotation_count: 0,
            calories_burned: 0.0,
            average_intensity: 0.0,
            duration_secs: 0.0,
        }
    }

    /// Whether the session has been sealed
    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }

    /// Duration formatted as `m:ss`
    pub fn formatted_duration(&self) -> String {
        let total = self.duration_secs as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// Aggregate statistics over a set of recorded sessions
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkoutStatistics {
    /// Number of sessions aggregated
    pub total_workouts: usize,
    /// Summed duration (seconds)
    pub total_duration_secs: f64,
    /// Summed calories (kcal)
    pub total_calories: f64,
    /// Summed jump count
    pub total_jumps: u64,
    /// Summed rotation count
    pub total_rotations: u64,
    /// Mean duration per session (seconds)
    pub average_duration_secs: f64,
    /// Mean calories per session (kcal)
    pub average_calories: f64,
}

impl WorkoutStatistics {
    /// Aggregate statistics over an iterator of sessions
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a WorkoutSession>) -> Self {
        let mut stats = WorkoutStatistics::default();
        for session in sessions {
            stats.total_workouts += 1;
            stats.total_duration_secs += session.duration_secs;
            stats.total_calories += session.calories_burned;
            stats.total_jumps += u64::from(session.jump_count);
            stats.total_rotations += u64::from(session.rotation_count);
        }
        if stats.total_workouts > 0 {
            let n = stats.total_workouts as f64;
            stats.average_duration_secs = stats.total_duration_secs / n;
            stats.average_calories = stats.total_calories / n;
        }
        stats
    }
}

/// Externally persisted workout history.
///
/// The recorder writes sealed sessions through this trait; durable storage
/// and historical listing are the caller's concern.
pub trait SessionStore: Send + Sync {
    /// Append a sealed session
    fn append(&self, session: WorkoutSession) -> Result<(), crate::Error>;

    /// Get all stored sessions
    fn all(&self) -> Result<Vec<WorkoutSession>, crate::Error>;

    /// Remove all stored sessions
    fn clear(&self) -> Result<(), crate::Error>;
}

/// In-memory session store implementation
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: parking_lot::RwLock<Vec<WorkoutSession>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn append(&self, session: WorkoutSession) -> Result<(), crate::Error> {
        self.sessions.write().push(session);
        Ok(())
    }

    fn all(&self) -> Result<Vec<WorkoutSession>, crate::Error> {
        Ok(self.sessions.read().clone())
    }

    fn clear(&self) -> Result<(), crate::Error> {
        self.sessions.write().clear();
        Ok(())
    }
}
