//! Workout session recording and history aggregation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{SessionStore, WorkoutSession, WorkoutStatistics};
use crate::Error;

/// Aggregated detector/calculator outputs for one recorder update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkoutUpdate {
    /// Jumps counted so far this session
    pub jump_count: u32,
    /// Rotations counted so far this session
    pub rotation_count: u32,
    /// Calories accumulated so far this session (kcal)
    pub calories_burned: f64,
    /// Mean intensity so far this session, in [0, 1]
    pub average_intensity: f64,
}

/// Session-scoped recorder: idle -> recording -> ended.
///
/// At most one session records at a time. Updates are snapshot merges: the
/// recorder holds the authoritative latest values supplied by the detectors
/// and the calculator, it never recomputes them. Ended sessions are
/// appended to the in-memory history and written through an optional
/// [`SessionStore`].
pub struct WorkoutRecorder {
    current: Option<WorkoutSession>,
    history: Vec<WorkoutSession>,
    store: Option<Arc<dyn SessionStore>>,
}

impl Default for WorkoutRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutRecorder {
    /// Create a recorder with no persistence collaborator
    pub fn new() -> Self {
        Self {
            current: None,
            history: Vec::new(),
            store: None,
        }
    }

    /// Create a recorder that writes ended sessions through a store
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            store: Some(store),
        }
    }

    /// Whether a session is currently recording
    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    /// The active session, if any
    pub fn current(&self) -> Option<&WorkoutSession> {
        self.current.as_ref()
    }

    /// All sessions recorded since construction or the last history clear
    pub fn history(&self) -> &[WorkoutSession] {
        &self.history
    }

    /// Start recording a new session.
    ///
    /// Fails when a session is already recording.
    pub fn start(
        &mut self,
        activity: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&WorkoutSession, Error> {
        if self.current.is_some() {
            return Err(Error::Session("a session is already recording".into()));
        }

        let session = WorkoutSession::new(activity, now);
        tracing::debug!(id = %session.id, activity = %session.activity, "workout started");
        Ok(self.current.insert(session))
    }

    /// Snapshot-merge the latest detector/calculator outputs into the
    /// active session and recompute its duration.
    ///
    /// Fails when no session is recording.
    pub fn update(&mut self, update: &WorkoutUpdate, now: DateTime<Utc>) -> Result<(), Error> {
        let session = self
            .current
            .as_mut()
            .ok_or_else(|| Error::Session("no active session to update".into()))?;

        session.jump_count = update.jump_count;
        session.rotation_count = update.rotation_count;
        session.calories_burned = update.calories_burned;
        session.average_intensity = update.average_intensity;
        session.duration_secs = (now - session.start_time).num_milliseconds() as f64 / 1000.0;
        Ok(())
    }

    /// Seal the active session, append it to history, and return it.
    ///
    /// Fails when no session is recording.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<WorkoutSession, Error> {
        let mut session = self
            .current
            .take()
            .ok_or_else(|| Error::Session("no active session to end".into()))?;

        session.end_time = Some(now);
        session.duration_secs = (now - session.start_time).num_milliseconds() as f64 / 1000.0;

        tracing::debug!(
            id = %session.id,
            duration = session.duration_secs,
            jumps = session.jump_count,
            rotations = session.rotation_count,
            calories = session.calories_burned,
            "workout ended"
        );

        self.history.push(session.clone());
        if let Some(store) = &self.store {
            store.append(session.clone())?;
        }
        Ok(session)
    }

    /// Discard the active session without recording it.
    ///
    /// Fails when no session is recording.
    pub fn cancel(&mut self) -> Result<WorkoutSession, Error> {
        let session = self
            .current
            .take()
            .ok_or_else(|| Error::Session("no active session to cancel".into()))?;
        tracing::debug!(id = %session.id, "workout cancelled");
        Ok(session)
    }

    /// Aggregate statistics over the full history
    pub fn statistics(&self) -> WorkoutStatistics {
        WorkoutStatistics::from_sessions(&self.history)
    }

    /// Aggregate statistics over the subset of history matching `filter`
    pub fn statistics_filtered(
        &self,
        filter: impl Fn(&WorkoutSession) -> bool,
    ) -> WorkoutStatistics {
        WorkoutStatistics::from_sessions(self.history.iter().filter(|s| filter(s)))
    }

    /// Destroy the recorded history (the only destructor of session
    /// records), clearing the attached store as well
    pub fn clear_history(&mut self) -> Result<(), Error> {
        self.history.clear();
        if let Some(store) = &self.store {
            store.clear()?;
        }
        tracing::debug!("workout history cleared");
        Ok(())
    }
}
