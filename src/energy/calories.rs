//! Calorie expenditure estimation from activity intensity and a BMR model.

use chrono::{DateTime, Utc};

use crate::detection::history::{SampleHistory, ScalarSample};
use crate::domain::{ProfileStore, UserProfile};
use crate::energy::intensity::{ActivitySample, IntensityConfig, IntensityModel};

/// Minutes per day, the BMR-to-rate denominator
const MINUTES_PER_DAY: f64 = 1440.0;
/// Floor for the average-rate denominator (hours)
const MIN_DURATION_HOURS: f64 = 0.01;

/// Configuration for calorie calculation
#[derive(Debug, Clone)]
pub struct CalorieCalculatorConfig {
    /// Intensity scoring parameters
    pub intensity: IntensityConfig,
    /// Capacity of the intensity history used for the running average
    pub intensity_history_capacity: usize,
    /// Peak activity multiplier reached at intensity 1.0 is
    /// `1 + intensity_multiplier_span`
    pub intensity_multiplier_span: f64,
}

impl Default for CalorieCalculatorConfig {
    fn default() -> Self {
        Self {
            intensity: IntensityConfig::default(),
            intensity_history_capacity: 30,
            intensity_multiplier_span: 7.0,
        }
    }
}

/// Immutable snapshot of the calculator's outputs
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalorieBreakdown {
    /// Cumulative calories this session (kcal)
    pub total_calories: f64,
    /// Instantaneous burn rate (kcal/min)
    pub current_rate: f64,
    /// Average burn rate over the session (kcal/hour)
    pub average_rate: f64,
    /// Elapsed session time (seconds)
    pub session_duration_secs: f64,
    /// Mean intensity over the recent history, in [0, 1]
    pub average_intensity: f64,
}

/// Estimates calorie expenditure from intensity scores and a user profile.
///
/// Each tick integrates `rate * dt` using caller-supplied wall-clock
/// timestamps; the component itself makes no timing assumptions.
pub struct CalorieCalculator {
    config: CalorieCalculatorConfig,
    intensity_model: IntensityModel,
    profile: UserProfile,
    intensity_history: SampleHistory,
    total_calories: f64,
    current_rate: f64,
    average_intensity: f64,
    session_start: DateTime<Utc>,
    last_update: DateTime<Utc>,
}

impl CalorieCalculator {
    /// Create a calculator with an explicit profile
    pub fn new(config: CalorieCalculatorConfig, profile: UserProfile, now: DateTime<Utc>) -> Self {
        let capacity = config.intensity_history_capacity;
        Self {
            intensity_model: IntensityModel::new(config.intensity.clone()),
            config,
            profile,
            intensity_history: SampleHistory::with_capacity(capacity),
            total_calories: 0.0,
            current_rate: 0.0,
            average_intensity: 0.0,
            session_start: now,
            last_update: now,
        }
    }

    /// Create with the default configuration and profile
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self::new(CalorieCalculatorConfig::default(), UserProfile::default(), now)
    }

    /// Create a calculator whose profile is loaded from a store, falling
    /// back to defaults when the store is empty
    pub fn from_store(
        config: CalorieCalculatorConfig,
        store: &dyn ProfileStore,
        now: DateTime<Utc>,
    ) -> Result<Self, crate::Error> {
        let profile = store.load()?.unwrap_or_default();
        Ok(Self::new(config, profile, now))
    }

    /// Run one update tick.
    ///
    /// Computes the instantaneous intensity for `sample`, updates the
    /// running average, and integrates calories over the time elapsed since
    /// the previous tick. Inactive ticks advance the clock without
    /// accruing calories.
    pub fn update(&mut self, sample: &ActivitySample, now: DateTime<Utc>) {
        let dt_secs = (now - self.last_update).num_milliseconds() as f64 / 1000.0;

        let intensity = self.intensity_model.score(sample);
        self.intensity_history
            .push(ScalarSample::new(now, intensity));
        self.average_intensity = self.intensity_history.mean();

        self.current_rate = self.rate_for_intensity(intensity);
        // Resting intervals accrue nothing; the rate still reflects the
        // resting burn so callers can display it
        if sample.is_active {
            self.total_calories += self.current_rate * (dt_secs / 60.0);
        }
        self.last_update = now;

        if self.intensity_history.len() == self.intensity_history.capacity() {
            tracing::trace!(
                intensity,
                rate = self.current_rate,
                total = self.total_calories,
                "calorie tick"
            );
        }
    }

    /// Burn rate in kcal/min for a given intensity
    fn rate_for_intensity(&self, intensity: f64) -> f64 {
        let bmr = self.profile.bmr_kcal_per_day();
        let activity_multiplier = 1.0 + intensity * self.config.intensity_multiplier_span;
        (bmr / MINUTES_PER_DAY) * activity_multiplier
    }

    /// Snapshot of the current outputs
    pub fn breakdown(&self) -> CalorieBreakdown {
        let duration_secs = (self.last_update - self.session_start).num_milliseconds() as f64 / 1000.0;
        let duration_hours = duration_secs / 3600.0;
        let average_rate = self.total_calories / duration_hours.max(MIN_DURATION_HOURS);

        CalorieBreakdown {
            total_calories: self.total_calories,
            current_rate: self.current_rate,
            average_rate,
            session_duration_secs: duration_secs,
            average_intensity: self.average_intensity,
        }
    }

    /// Cumulative calories this session (kcal)
    pub fn total_calories(&self) -> f64 {
        self.total_calories
    }

    /// Instantaneous burn rate (kcal/min)
    pub fn current_rate(&self) -> f64 {
        self.current_rate
    }

    /// Mean intensity over the recent history
    pub fn average_intensity(&self) -> f64 {
        self.average_intensity
    }

    /// The profile currently in use
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Replace the user profile.
    ///
    /// Takes effect from the next tick; already-accumulated totals are
    /// unchanged.
    pub fn update_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    /// Replace the user profile and write it through to a store
    pub fn save_profile(
        &mut self,
        profile: UserProfile,
        store: &dyn ProfileStore,
    ) -> Result<(), crate::Error> {
        store.save(profile)?;
        self.profile = profile;
        Ok(())
    }

    /// Zero all totals, clear the intensity history, and restart timers at
    /// `now`. Idempotent.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.total_calories = 0.0;
        self.current_rate = 0.0;
        self.average_intensity = 0.0;
        self.intensity_history.clear();
        self.session_start = now;
        self.last_update = now;
        tracing::trace!("calorie calculator reset");
    }
}
