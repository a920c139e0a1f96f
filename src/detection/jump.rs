//! Jump detection from ankle-height variations.

use chrono::{DateTime, Utc};

use crate::detection::history::{SampleHistory, ScalarSample};
use crate::domain::{Joint, KeypointFrame, MotionEvent};

/// Configuration for jump detection
#[derive(Debug, Clone)]
pub struct JumpDetectorConfig {
    /// Minimum upward height change to count as a jump (normalized units)
    pub jump_threshold: f64,
    /// Minimum upward height change to register rising motion
    pub rise_threshold: f64,
    /// Minimum downward height change to register the end of a jump
    pub fall_threshold: f64,
    /// Minimum interval between two counted jumps (seconds)
    pub min_jump_interval_secs: f64,
    /// Capacity of the ankle-height history
    pub history_capacity: usize,
    /// Samples required before detection runs; values below 3 are treated
    /// as 3, the size of the detection window
    pub min_samples: usize,
}

impl Default for JumpDetectorConfig {
    fn default() -> Self {
        Self {
            jump_threshold: 0.08,
            rise_threshold: 0.02,
            fall_threshold: 0.02,
            min_jump_interval_secs: 0.5,
            history_capacity: 10,
            min_samples: 3,
        }
    }
}

/// Phase of the jump state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpPhase {
    Idle,
    Rising,
    Falling,
    Landed,
}

/// Detector for jumps in a stream of ankle positions.
///
/// Feeds on frames carrying both ankle joints; frames missing either ankle
/// are skipped without a state change. Emits one [`MotionEvent::Jump`] per
/// qualifying up-cycle, debounce-gated on frame timestamps.
pub struct JumpDetector {
    config: JumpDetectorConfig,
    ankle_heights: SampleHistory,
    phase: JumpPhase,
    jump_count: u32,
    jump_height: f64,
    last_jump_time: Option<DateTime<Utc>>,
}

impl JumpDetector {
    /// Create a new jump detector
    pub fn new(config: JumpDetectorConfig) -> Self {
        let capacity = config.history_capacity;
        Self {
            config,
            ankle_heights: SampleHistory::with_capacity(capacity),
            phase: JumpPhase::Idle,
            jump_count: 0,
            jump_height: 0.0,
            last_jump_time: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(JumpDetectorConfig::default())
    }

    /// Process one keypoint frame, returning a jump event when one is detected
    pub fn process(&mut self, frame: &KeypointFrame) -> Option<MotionEvent> {
        let left = frame.joint(Joint::LeftAnkle)?;
        let right = frame.joint(Joint::RightAnkle)?;

        let average_y = (left.y + right.y) / 2.0;
        self.ankle_heights
            .push(ScalarSample::new(frame.timestamp, average_y));

        // The detection window reads three samples regardless of the
        // configured minimum
        if self.ankle_heights.len() < self.config.min_samples.max(3) {
            return None;
        }

        self.detect(frame.timestamp)
    }

    fn detect(&mut self, now: DateTime<Utc>) -> Option<MotionEvent> {
        let recent = self.ankle_heights.last_n(3);
        let current_y = recent[2].value;
        let previous_y = recent[1].value;
        let before_previous_y = recent[0].value;

        // Image origin is top-left, so upward motion decreases y.
        let height_change = previous_y - current_y;
        let previous_height_change = before_previous_y - previous_y;

        let is_rising = height_change > self.config.rise_threshold;
        let is_significant_rise = height_change > self.config.jump_threshold;
        let can_jump = self
            .last_jump_time
            .map_or(true, |t| elapsed_secs(t, now) >= self.config.min_jump_interval_secs);

        if !self.is_jumping() && can_jump && is_rising && is_significant_rise {
            self.jump_count += 1;
            self.phase = JumpPhase::Rising;
            self.jump_height = height_change;
            self.last_jump_time = Some(now);

            tracing::debug!(
                count = self.jump_count,
                height = self.jump_height,
                "jump detected"
            );
            return Some(MotionEvent::Jump {
                height: height_change,
                timestamp: now,
            });
        }

        if self.is_jumping() && !is_rising && height_change < -self.config.fall_threshold {
            self.phase = JumpPhase::Landed;
            tracing::trace!("jump ended");
        } else if self.is_jumping() && height_change < 0.0 && previous_height_change > 0.0 {
            // Apex passed, descending but not yet landed
            self.phase = JumpPhase::Falling;
        }

        None
    }

    /// Total jumps counted since construction or the last reset
    pub fn jump_count(&self) -> u32 {
        self.jump_count
    }

    /// Whether a jump is currently in progress
    pub fn is_jumping(&self) -> bool {
        matches!(self.phase, JumpPhase::Rising | JumpPhase::Falling)
    }

    /// Height of the most recent detected jump (normalized units)
    pub fn jump_height(&self) -> f64 {
        self.jump_height
    }

    /// Timestamp of the most recent counted jump
    pub fn last_jump_time(&self) -> Option<DateTime<Utc>> {
        self.last_jump_time
    }

    /// Clear all history, counters, and timestamps. Idempotent.
    pub fn reset(&mut self) {
        self.ankle_heights.clear();
        self.phase = JumpPhase::Idle;
        self.jump_count = 0;
        self.jump_height = 0.0;
        self.last_jump_time = None;
        tracing::trace!("jump detector reset");
    }
}

fn elapsed_secs(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point2;
    use chrono::TimeZone;

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn ankle_frame(millis: i64, y: f64) -> KeypointFrame {
        KeypointFrame::empty(ts(millis))
            .with_joint(Joint::LeftAnkle, Point2::new(0.45, y))
            .with_joint(Joint::RightAnkle, Point2::new(0.55, y))
    }

    fn feed(detector: &mut JumpDetector, samples: &[(i64, f64)]) -> Vec<MotionEvent> {
        samples
            .iter()
            .filter_map(|&(t, y)| detector.process(&ankle_frame(t, y)))
            .collect()
    }

    #[test]
    fn test_clean_cycle_counts_once() {
        let mut detector = JumpDetector::with_defaults();

        // Standing, then a 0.1 rise (above the 0.08 threshold), then landing
        let events = feed(
            &mut detector,
            &[
                (0, 0.90),
                (100, 0.90),
                (200, 0.90),
                (300, 0.80), // rise
                (400, 0.78), // still airborne
                (500, 0.90), // fall
            ],
        );

        assert_eq!(detector.jump_count(), 1);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MotionEvent::Jump { .. }));
        assert!(!detector.is_jumping());
        assert!((detector.jump_height() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_small_rise_ignored() {
        let mut detector = JumpDetector::with_defaults();

        // 0.05 rise exceeds the rise threshold but not the jump threshold
        let events = feed(
            &mut detector,
            &[(0, 0.90), (100, 0.90), (200, 0.85), (300, 0.90)],
        );

        assert_eq!(detector.jump_count(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_debounce_suppresses_rapid_second_jump() {
        let mut detector = JumpDetector::with_defaults();

        feed(
            &mut detector,
            &[
                (0, 0.90),
                (100, 0.90),
                (200, 0.80), // jump 1
                (300, 0.90), // land
                (400, 0.80), // rise again, only 0.2s after jump 1
            ],
        );

        assert_eq!(detector.jump_count(), 1);
    }

    #[test]
    fn test_two_spaced_cycles_count_twice() {
        let mut detector = JumpDetector::with_defaults();

        feed(
            &mut detector,
            &[
                (0, 0.90),
                (100, 0.90),
                (200, 0.80),  // jump 1
                (300, 0.90),  // land
                (800, 0.90),
                (900, 0.80),  // jump 2, 0.7s after jump 1
                (1000, 0.90), // land
            ],
        );

        assert_eq!(detector.jump_count(), 2);
    }

    #[test]
    fn test_min_samples_below_window_is_safe() {
        let config = JumpDetectorConfig {
            min_samples: 2,
            ..Default::default()
        };
        let mut detector = JumpDetector::new(config);

        // Two frames are below the three-sample detection window; they must
        // be absorbed without detection
        let events = feed(&mut detector, &[(0, 0.90), (100, 0.90)]);
        assert!(events.is_empty());
        assert_eq!(detector.jump_count(), 0);

        // Detection engages normally from the third sample on
        let events = feed(&mut detector, &[(200, 0.80), (300, 0.90)]);
        assert_eq!(detector.jump_count(), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_missing_ankle_skipped() {
        let mut detector = JumpDetector::with_defaults();

        let partial = KeypointFrame::empty(ts(0)).with_joint(Joint::LeftAnkle, Point2::new(0.4, 0.9));
        assert!(detector.process(&partial).is_none());
        assert_eq!(detector.jump_count(), 0);

        // The dropped frame must not have entered the history
        feed(
            &mut detector,
            &[(100, 0.90), (200, 0.90), (300, 0.90), (400, 0.80)],
        );
        assert_eq!(detector.jump_count(), 1);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut detector = JumpDetector::with_defaults();
        feed(
            &mut detector,
            &[(0, 0.90), (100, 0.90), (200, 0.80), (300, 0.90)],
        );
        assert_eq!(detector.jump_count(), 1);

        detector.reset();
        detector.reset(); // idempotent
        assert_eq!(detector.jump_count(), 0);
        assert!(!detector.is_jumping());
        assert!(detector.jump_height().abs() < f64::EPSILON);
        assert!(detector.last_jump_time().is_none());

        // Behaves like a freshly constructed instance
        let events = feed(
            &mut detector,
            &[(0, 0.90), (100, 0.90), (200, 0.80), (300, 0.90)],
        );
        assert_eq!(detector.jump_count(), 1);
        assert_eq!(events.len(), 1);
    }
}
