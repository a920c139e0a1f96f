//! Full-body rotation detection from shoulder and hip orientation.

use chrono::{DateTime, Utc};

use crate::detection::history::{SampleHistory, ScalarSample};
use crate::domain::{Joint, KeypointFrame, MotionEvent, RotationDirection};

/// Configuration for rotation detection
#[derive(Debug, Clone)]
pub struct RotationDetectorConfig {
    /// Per-step angular change that casts a direction vote (radians)
    pub step_threshold_rad: f64,
    /// Accumulated rotation that counts as a full turn (radians, ~315 deg
    /// to allow for measurement noise under a full 2*pi turn)
    pub full_rotation_threshold_rad: f64,
    /// Accumulated rotation below which the motion is considered settled
    pub settle_threshold_rad: f64,
    /// Minimum interval between two counted rotations (seconds)
    pub min_rotation_interval_secs: f64,
    /// Capacity of the angle histories
    pub history_capacity: usize,
    /// Samples required before detection runs; also the sliding-window size.
    /// Clamped to `history_capacity` at construction, since the history can
    /// never hold more samples than its capacity
    pub window_size: usize,
    /// Consistent direction votes required for a reliable direction
    pub min_consistent_votes: i32,
}

impl Default for RotationDetectorConfig {
    fn default() -> Self {
        Self {
            step_threshold_rad: 0.3,
            full_rotation_threshold_rad: 5.5,
            settle_threshold_rad: 0.5,
            min_rotation_interval_secs: 1.0,
            history_capacity: 15,
            window_size: 5,
            min_consistent_votes: 3,
        }
    }
}

/// Detector for full body rotations in a stream of torso keypoints.
///
/// Tracks the shoulder-line angle over a sliding window and sums the
/// re-normalized pairwise angular differences, so accumulation survives the
/// +-pi wrap boundary. Direction is established by voting: each step larger
/// than the step threshold votes for its sign, and a turn is only counted
/// when enough votes agree. Emits one [`MotionEvent::Rotation`] per
/// completed turn, debounce-gated on frame timestamps.
pub struct RotationDetector {
    config: RotationDetectorConfig,
    shoulder_angles: SampleHistory,
    body_orientations: SampleHistory,
    is_rotating: bool,
    rotation_count: u32,
    current_angle: f64,
    direction: RotationDirection,
    last_rotation_time: Option<DateTime<Utc>>,
}

impl RotationDetector {
    /// Create a new rotation detector
    pub fn new(mut config: RotationDetectorConfig) -> Self {
        config.window_size = config.window_size.min(config.history_capacity);
        let capacity = config.history_capacity;
        Self {
            config,
            shoulder_angles: SampleHistory::with_capacity(capacity),
            body_orientations: SampleHistory::with_capacity(capacity),
            is_rotating: false,
            rotation_count: 0,
            current_angle: 0.0,
            direction: RotationDirection::None,
            last_rotation_time: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(RotationDetectorConfig::default())
    }

    /// Process one keypoint frame, returning a rotation event when a full
    /// turn is detected
    pub fn process(&mut self, frame: &KeypointFrame) -> Option<MotionEvent> {
        let left_shoulder = frame.joint(Joint::LeftShoulder)?;
        let right_shoulder = frame.joint(Joint::RightShoulder)?;
        let left_hip = frame.joint(Joint::LeftHip)?;
        let right_hip = frame.joint(Joint::RightHip)?;

        let shoulder_angle = (right_shoulder.y - left_shoulder.y)
            .atan2(right_shoulder.x - left_shoulder.x);

        let shoulder_center = left_shoulder.midpoint(&right_shoulder);
        let hip_center = left_hip.midpoint(&right_hip);
        let body_orientation =
            (shoulder_center.y - hip_center.y).atan2(shoulder_center.x - hip_center.x);

        self.shoulder_angles.push(ScalarSample::new(
            frame.timestamp,
            normalize_angle(shoulder_angle),
        ));
        self.body_orientations.push(ScalarSample::new(
            frame.timestamp,
            normalize_angle(body_orientation),
        ));

        if self.shoulder_angles.len() < self.config.window_size {
            return None;
        }

        self.detect(frame.timestamp)
    }

    fn detect(&mut self, now: DateTime<Utc>) -> Option<MotionEvent> {
        let recent = self.shoulder_angles.last_n(self.config.window_size);

        // Each pairwise difference is re-normalized before summing so
        // accumulation is continuous across the wrap boundary. A reversal
        // within the window under- or over-counts by design.
        let mut total_rotation = 0.0;
        let mut direction = RotationDirection::None;
        let mut direction_consistency: i32 = 0;

        for pair in recent.windows(2) {
            let diff = normalize_angle(pair[1].value - pair[0].value);
            total_rotation += diff;

            if diff.abs() > self.config.step_threshold_rad {
                if diff > 0.0 {
                    if matches!(
                        direction,
                        RotationDirection::Clockwise | RotationDirection::None
                    ) {
                        direction = RotationDirection::Clockwise;
                        direction_consistency += 1;
                    } else {
                        direction_consistency -= 1;
                    }
                } else if matches!(
                    direction,
                    RotationDirection::CounterClockwise | RotationDirection::None
                ) {
                    direction = RotationDirection::CounterClockwise;
                    direction_consistency += 1;
                } else {
                    direction_consistency -= 1;
                }
            }
        }

        let can_rotate = self.last_rotation_time.map_or(true, |t| {
            elapsed_secs(t, now) >= self.config.min_rotation_interval_secs
        });
        let is_consistent = direction_consistency >= self.config.min_consistent_votes;

        let mut event = None;

        if !self.is_rotating
            && can_rotate
            && total_rotation.abs() >= self.config.full_rotation_threshold_rad
            && is_consistent
        {
            self.rotation_count += 1;
            self.is_rotating = true;
            self.direction = direction;
            self.last_rotation_time = Some(now);

            tracing::debug!(
                count = self.rotation_count,
                total = total_rotation,
                direction = ?direction,
                "rotation detected"
            );
            event = Some(MotionEvent::Rotation {
                direction,
                total_angle_rad: total_rotation,
                timestamp: now,
            });
        } else if self.is_rotating && total_rotation.abs() < self.config.settle_threshold_rad {
            self.is_rotating = false;
            self.direction = RotationDirection::None;
            tracing::trace!("rotation ended");
        }

        self.current_angle = total_rotation;
        event
    }

    /// Total rotations counted since construction or the last reset
    pub fn rotation_count(&self) -> u32 {
        self.rotation_count
    }

    /// Whether a rotation is currently in progress
    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    /// Latest windowed rotation accumulation (radians, signed), updated on
    /// every detection pass regardless of event emission
    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    /// Direction of the rotation in progress, `None` when settled
    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    /// Timestamp of the most recent counted rotation
    pub fn last_rotation_time(&self) -> Option<DateTime<Utc>> {
        self.last_rotation_time
    }

    /// Clear all histories, counters, and state. Idempotent.
    pub fn reset(&mut self) {
        self.shoulder_angles.clear();
        self.body_orientations.clear();
        self.is_rotating = false;
        self.rotation_count = 0;
        self.current_angle = 0.0;
        self.direction = RotationDirection::None;
        self.last_rotation_time = None;
        tracing::trace!("rotation detector reset");
    }
}

/// Normalize an angle into (-pi, pi]
fn normalize_angle(angle: f64) -> f64 {
    let mut normalized = angle;
    while normalized > std::f64::consts::PI {
        normalized -= 2.0 * std::f64::consts::PI;
    }
    while normalized < -std::f64::consts::PI {
        normalized += 2.0 * std::f64::consts::PI;
    }
    normalized
}

fn elapsed_secs(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point2;
    use chrono::TimeZone;
    use std::f64::consts::PI;

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    /// Build a frame whose shoulder line sits at `angle` radians. Hips stay
    /// fixed below the shoulder center.
    fn torso_frame(millis: i64, angle: f64) -> KeypointFrame {
        let center = Point2::new(0.5, 0.4);
        let half = 0.15;
        let dx = half * angle.cos();
        let dy = half * angle.sin();

        KeypointFrame::empty(ts(millis))
            .with_joint(Joint::LeftShoulder, Point2::new(center.x - dx, center.y - dy))
            .with_joint(Joint::RightShoulder, Point2::new(center.x + dx, center.y + dy))
            .with_joint(Joint::LeftHip, Point2::new(0.45, 0.6))
            .with_joint(Joint::RightHip, Point2::new(0.55, 0.6))
    }

    fn feed(detector: &mut RotationDetector, samples: &[(i64, f64)]) -> Vec<MotionEvent> {
        samples
            .iter()
            .filter_map(|&(t, a)| detector.process(&torso_frame(t, a)))
            .collect()
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI) + PI).abs() < 1e-12);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_full_turn_counts_once() {
        let mut detector = RotationDetector::with_defaults();

        // Five samples, 1.5 rad per step: total 6.0 rad with four
        // consistent votes
        let events = feed(
            &mut detector,
            &[(0, 0.0), (100, 1.5), (200, 3.0), (300, 4.5), (400, 6.0)],
        );

        assert_eq!(detector.rotation_count(), 1);
        assert_eq!(events.len(), 1);
        match &events[0] {
            MotionEvent::Rotation {
                direction,
                total_angle_rad,
                ..
            } => {
                assert_eq!(*direction, RotationDirection::Clockwise);
                assert!((*total_angle_rad - 6.0).abs() < 1e-9);
            }
            other => panic!("expected rotation event, got {other:?}"),
        }
        assert!(detector.is_rotating());
        assert_eq!(detector.direction(), RotationDirection::Clockwise);
    }

    #[test]
    fn test_accumulation_across_wrap_boundary() {
        let mut detector = RotationDetector::with_defaults();

        // Steps of 1.5 rad starting near +pi so stored angles wrap negative
        let events = feed(
            &mut detector,
            &[(0, 2.0), (100, 3.5), (200, 5.0), (300, 6.5), (400, 8.0)],
        );

        assert_eq!(detector.rotation_count(), 1);
        assert_eq!(events.len(), 1);
        assert!((detector.current_angle() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_counter_clockwise_direction() {
        let mut detector = RotationDetector::with_defaults();

        let events = feed(
            &mut detector,
            &[(0, 0.0), (100, -1.5), (200, -3.0), (300, -4.5), (400, -6.0)],
        );

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MotionEvent::Rotation {
                direction: RotationDirection::CounterClockwise,
                ..
            }
        ));
        assert!(detector.current_angle() < 0.0);
    }

    #[test]
    fn test_reversed_rotation_not_counted() {
        let mut detector = RotationDetector::with_defaults();

        // Three forward steps of 3.0 rad then one backward: total 6.0 rad
        // but only 2 net consistent votes
        let events = feed(
            &mut detector,
            &[(0, 0.0), (100, 3.0), (200, 6.0), (300, 9.0), (400, 6.0)],
        );

        assert_eq!(detector.rotation_count(), 0);
        assert!(events.is_empty());
        // current_angle still tracks the accumulated total for display
        assert!((detector.current_angle() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_turn_not_counted() {
        let mut detector = RotationDetector::with_defaults();

        // 1.0 rad per step: total 4.0 rad, below the 5.5 threshold
        let events = feed(
            &mut detector,
            &[(0, 0.0), (100, 1.0), (200, 2.0), (300, 3.0), (400, 4.0)],
        );

        assert_eq!(detector.rotation_count(), 0);
        assert!(events.is_empty());
        assert!((detector.current_angle() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_settle_then_second_turn() {
        let mut detector = RotationDetector::with_defaults();

        feed(
            &mut detector,
            &[(0, 0.0), (100, 1.5), (200, 3.0), (300, 4.5), (400, 6.0)],
        );
        assert!(detector.is_rotating());

        // Hold still: windowed total decays below the settle threshold
        feed(
            &mut detector,
            &[(500, 6.0), (600, 6.0), (700, 6.0), (800, 6.0)],
        );
        assert!(!detector.is_rotating());
        assert_eq!(detector.direction(), RotationDirection::None);

        // Second turn, 1.5s after the first: counted
        let events = feed(
            &mut detector,
            &[(1900, 7.5), (2000, 9.0), (2100, 10.5), (2200, 12.0)],
        );
        assert_eq!(detector.rotation_count(), 2);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_debounce_suppresses_rapid_second_turn() {
        let mut detector = RotationDetector::with_defaults();

        feed(
            &mut detector,
            &[(0, 0.0), (100, 1.5), (200, 3.0), (300, 4.5), (400, 6.0)],
        );
        assert_eq!(detector.rotation_count(), 1);

        // Settle, then spin again well inside the 1.0s debounce window
        feed(
            &mut detector,
            &[(450, 6.0), (500, 6.0), (550, 6.0), (600, 6.0)],
        );
        assert!(!detector.is_rotating());

        feed(
            &mut detector,
            &[(700, 7.5), (750, 9.0), (800, 10.5), (850, 12.0)],
        );
        assert_eq!(detector.rotation_count(), 1);
    }

    #[test]
    fn test_oversized_window_clamped_to_capacity() {
        let config = RotationDetectorConfig {
            window_size: 50,
            history_capacity: 5,
            ..Default::default()
        };
        let mut detector = RotationDetector::new(config);

        // A window larger than the history could never fill; clamping keeps
        // detection live over the whole stored history
        let events = feed(
            &mut detector,
            &[(0, 0.0), (100, 1.5), (200, 3.0), (300, 4.5), (400, 6.0)],
        );
        assert_eq!(detector.rotation_count(), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_missing_hip_skipped() {
        let mut detector = RotationDetector::with_defaults();

        let partial = KeypointFrame::empty(ts(0))
            .with_joint(Joint::LeftShoulder, Point2::new(0.4, 0.4))
            .with_joint(Joint::RightShoulder, Point2::new(0.6, 0.4))
            .with_joint(Joint::LeftHip, Point2::new(0.45, 0.6));

        assert!(detector.process(&partial).is_none());
        assert_eq!(detector.rotation_count(), 0);
        assert!(detector.current_angle().abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut detector = RotationDetector::with_defaults();
        feed(
            &mut detector,
            &[(0, 0.0), (100, 1.5), (200, 3.0), (300, 4.5), (400, 6.0)],
        );
        assert_eq!(detector.rotation_count(), 1);

        detector.reset();
        detector.reset(); // idempotent
        assert_eq!(detector.rotation_count(), 0);
        assert!(!detector.is_rotating());
        assert_eq!(detector.direction(), RotationDirection::None);
        assert!(detector.current_angle().abs() < f64::EPSILON);

        // Behaves like a freshly constructed instance
        let events = feed(
            &mut detector,
            &[(0, 0.0), (100, 1.5), (200, 3.0), (300, 4.5), (400, 6.0)],
        );
        assert_eq!(detector.rotation_count(), 1);
        assert_eq!(events.len(), 1);
    }
}
