//! Domain events emitted by the detectors and the workout recorder.

use chrono::{DateTime, Utc};

use super::session::WorkoutSessionId;

/// Direction of a detected body rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationDirection {
    /// Rotating clockwise (positive angular delta in image space)
    Clockwise,
    /// Rotating counter-clockwise
    CounterClockwise,
    /// No reliable direction
    #[default]
    None,
}

/// Discrete motion events produced by the detectors.
///
/// Emitted exactly once per qualifying cycle; never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionEvent {
    /// A jump was detected
    Jump {
        /// Vertical rise that triggered the detection (normalized units)
        height: f64,
        /// When the debounce-gated transition occurred
        timestamp: DateTime<Utc>,
    },
    /// A full body rotation was detected
    Rotation {
        /// Direction of the turn
        direction: RotationDirection,
        /// Accumulated rotation over the detection window (radians, signed)
        total_angle_rad: f64,
        /// When the debounce-gated transition occurred
        timestamp: DateTime<Utc>,
    },
}

impl MotionEvent {
    /// Get the timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Jump { timestamp, .. } => *timestamp,
            Self::Rotation { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Jump { .. } => "Jump",
            Self::Rotation { .. } => "Rotation",
        }
    }
}

/// Session lifecycle events
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    /// A workout session started recording
    Started {
        /// Session identity
        session_id: WorkoutSessionId,
        /// Activity-type label
        activity: String,
        /// Start instant
        timestamp: DateTime<Utc>,
    },
    /// A workout session ended and was sealed
    Ended {
        /// Session identity
        session_id: WorkoutSessionId,
        /// Total duration in seconds
        duration_secs: f64,
        /// Calories accumulated over the session
        calories_burned: f64,
        /// End instant
        timestamp: DateTime<Utc>,
    },
    /// A workout session was discarded without being recorded
    Cancelled {
        /// Session identity
        session_id: WorkoutSessionId,
        /// Cancellation instant
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Get the timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Started { timestamp, .. } => *timestamp,
            Self::Ended { timestamp, .. } => *timestamp,
            Self::Cancelled { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "SessionStarted",
            Self::Ended { .. } => "SessionEnded",
            Self::Cancelled { .. } => "SessionCancelled",
        }
    }

    /// Get the session ID associated with this event
    pub fn session_id(&self) -> &WorkoutSessionId {
        match self {
            Self::Started { session_id, .. } => session_id,
            Self::Ended { session_id, .. } => session_id,
            Self::Cancelled { session_id, .. } => session_id,
        }
    }
}

/// All events the workout engine can emit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkoutEvent {
    /// Motion detector events
    Motion(MotionEvent),
    /// Session lifecycle events
    Session(SessionEvent),
}

impl WorkoutEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            WorkoutEvent::Motion(e) => e.timestamp(),
            WorkoutEvent::Session(e) => e.timestamp(),
        }
    }

    /// Get event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            WorkoutEvent::Motion(e) => e.event_type(),
            WorkoutEvent::Session(e) => e.event_type(),
        }
    }
}

/// Sink for events produced while processing frames and ticks.
///
/// Replaces UI-bound observable fields: any consumer (callback bridge,
/// channel, poller) implements this to receive events.
pub trait EventStore: Send + Sync {
    /// Append an event to the store
    fn append(&self, event: WorkoutEvent) -> Result<(), crate::Error>;

    /// Get all events
    fn all(&self) -> Result<Vec<WorkoutEvent>, crate::Error>;

    /// Get events since a timestamp
    fn since(&self, timestamp: DateTime<Utc>) -> Result<Vec<WorkoutEvent>, crate::Error>;
}

/// In-memory event store implementation
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: parking_lot::RwLock<Vec<WorkoutEvent>>,
}

impl InMemoryEventStore {
    /// Create a new in-memory event store
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, event: WorkoutEvent) -> Result<(), crate::Error> {
        self.events.write().push(event);
        Ok(())
    }

    fn all(&self) -> Result<Vec<WorkoutEvent>, crate::Error> {
        Ok(self.events.read().clone())
    }

    fn since(&self, timestamp: DateTime<Utc>) -> Result<Vec<WorkoutEvent>, crate::Error> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|e| e.timestamp() >= timestamp)
            .cloned()
            .collect())
    }
}
