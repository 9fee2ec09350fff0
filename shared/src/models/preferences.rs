//! User preference models

use serde::{Deserialize, Serialize};

use crate::types::{Language, PressureUnit, Theme, UnitSystem, WindSpeedUnit};

/// Dashboard preferences, persisted as one record.
///
/// Missing fields in a stored record fall back to their defaults, so an
/// older or partial record merges over [`UserPreferences::default`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub units: UnitSystem,
    pub language: Language,
    pub wind_speed_unit: WindSpeedUnit,
    pub pressure_unit: PressureUnit,
    pub theme: Theme,
}

/// Partial preference update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
    pub units: Option<UnitSystem>,
    pub language: Option<Language>,
    pub wind_speed_unit: Option<WindSpeedUnit>,
    pub pressure_unit: Option<PressureUnit>,
    pub theme: Option<Theme>,
}

impl PreferencesUpdate {
    /// Merge this update over `current`
    pub fn apply(&self, current: UserPreferences) -> UserPreferences {
        UserPreferences {
            units: self.units.unwrap_or(current.units),
            language: self.language.unwrap_or(current.language),
            wind_speed_unit: self.wind_speed_unit.unwrap_or(current.wind_speed_unit),
            pressure_unit: self.pressure_unit.unwrap_or(current.pressure_unit),
            theme: self.theme.unwrap_or(current.theme),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
