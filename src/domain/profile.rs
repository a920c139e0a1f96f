//! User physiological profile and basal metabolic rate.

/// Default body weight applied when the stored profile is unset (kg)
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
/// Default body height applied when the stored profile is unset (cm)
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
/// Default age applied when the stored profile is unset (years)
pub const DEFAULT_AGE_YEARS: u32 = 30;
/// Minimum basal metabolic rate (kcal/day)
pub const MIN_BMR_KCAL_PER_DAY: f64 = 1200.0;

/// User physiological profile consumed by the calorie calculator.
///
/// Zero or negative fields are treated as unset and replaced by defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserProfile {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Body height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age_years: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            height_cm: DEFAULT_HEIGHT_CM,
            age_years: DEFAULT_AGE_YEARS,
        }
    }
}

impl UserProfile {
    /// Create a profile, applying defaults for unset (zero or negative) fields
    pub fn new(weight_kg: f64, height_cm: f64, age_years: u32) -> Self {
        Self {
            weight_kg: if weight_kg > 0.0 {
                weight_kg
            } else {
                DEFAULT_WEIGHT_KG
            },
            height_cm: if height_cm > 0.0 {
                height_cm
            } else {
                DEFAULT_HEIGHT_CM
            },
            age_years: if age_years > 0 {
                age_years
            } else {
                DEFAULT_AGE_YEARS
            },
        }
    }

    /// Basal metabolic rate via the generalized Mifflin-St Jeor equation
    /// (no sex adjustment), floored at [`MIN_BMR_KCAL_PER_DAY`].
    pub fn bmr_kcal_per_day(&self) -> f64 {
        let bmr = 10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * self.age_years as f64 + 5.0;
        bmr.max(MIN_BMR_KCAL_PER_DAY)
    }
}

/// Externally persisted profile storage.
///
/// The calculator reads the profile on construction and writes through on
/// explicit profile updates; durable storage is the caller's concern.
pub trait ProfileStore: Send + Sync {
    /// Load the stored profile, if any
    fn load(&self) -> Result<Option<UserProfile>, crate::Error>;

    /// Persist the profile
    fn save(&self, profile: UserProfile) -> Result<(), crate::Error>;
}

/// In-memory profile store implementation
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profile: parking_lot::RwLock<Option<UserProfile>>,
}

impl InMemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a profile
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: parking_lot::RwLock::new(Some(profile)),
        }
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self) -> Result<Option<UserProfile>, crate::Error> {
        Ok(*self.profile.read())
    }

    fn save(&self, profile: UserProfile) -> Result<(), crate::Error> {
        *self.profile.write() = Some(profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_for_unset_fields() {
        let profile = UserProfile::new(0.0, 0.0, 0);
        assert!((profile.weight_kg - 70.0).abs() < f64::EPSILON);
        assert!((profile.height_cm - 170.0).abs() < f64::EPSILON);
        assert_eq!(profile.age_years, 30);
    }

    #[test]
    fn test_bmr_reference_value() {
        // 70kg / 170cm / 30y => 700 + 1062.5 - 150 + 5 = 1617.5
        let profile = UserProfile::default();
        assert!((profile.bmr_kcal_per_day() - 1617.5).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_floor() {
        // 300 + 750 - 400 + 5 = 655 => floored to 1200
        let profile = UserProfile::new(30.0, 120.0, 80);
        assert!((profile.bmr_kcal_per_day() - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_store_round_trip() {
        let store = InMemoryProfileStore::new();
        assert!(store.load().unwrap().is_none());

        let profile = UserProfile::new(82.5, 180.0, 41);
        store.save(profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));
    }
}
