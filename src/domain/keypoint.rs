//! Keypoint frames delivered by the external pose-estimation pipeline.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A 2D point in normalized image space (0.0-1.0, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (increases downward)
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between this point and another
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Named body joints produced by the upstream pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint {
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Head / nose reference point
    Nose,
}

/// One pose-estimation cycle's worth of joint coordinates.
///
/// Immutable once created. Frames with missing joints are legal; detectors
/// skip frames that lack the joints they need.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeypointFrame {
    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
    joints: HashMap<Joint, Point2>,
}

impl KeypointFrame {
    /// Create a frame from a joint map
    pub fn new(timestamp: DateTime<Utc>, joints: HashMap<Joint, Point2>) -> Self {
        Self { timestamp, joints }
    }

    /// Create an empty frame
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            joints: HashMap::new(),
        }
    }

    /// Builder-style joint insertion
    pub fn with_joint(mut self, joint: Joint, point: Point2) -> Self {
        self.joints.insert(joint, point);
        self
    }

    /// Look up a joint coordinate
    pub fn joint(&self, joint: Joint) -> Option<Point2> {
        self.joints.get(&joint).copied()
    }

    /// Whether all the given joints are present
    pub fn has_joints(&self, joints: &[Joint]) -> bool {
        joints.iter().all(|j| self.joints.contains_key(j))
    }

    /// Number of joints in the frame
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the frame carries no joints
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}
