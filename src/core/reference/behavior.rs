use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Behavior and exposure derating factors. Schedule and occupancy factors
/// only ever reduce demand (≤ 1.0); wind exposure scales the air-change
/// rate either way.

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeatingSchedule {
    Continuous,
    #[default]
    DayNight,
    Frugal,
    /// Frost protection only / holiday setback.
    Minimal,
}

impl HeatingSchedule {
    pub fn factor(self) -> f64 {
        match self {
            HeatingSchedule::Continuous => 1.0,
            HeatingSchedule::DayNight => 0.90,
            HeatingSchedule::Frugal => 0.80,
            HeatingSchedule::Minimal => 0.65,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Permanent,
    MostlyHome,
    Working,
    HolidayHome,
}

impl Occupancy {
    pub fn factor(self) -> f64 {
        match self {
            Occupancy::Permanent => 1.0,
            Occupancy::MostlyHome => 0.95,
            Occupancy::Working => 0.85,
            Occupancy::HolidayHome => 0.50,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WindExposure {
    Sheltered,
    #[default]
    Normal,
    Exposed,
}

impl WindExposure {
    /// Multiplier applied to the building's air-change rate.
    pub fn air_change_factor(self) -> f64 {
        match self {
            WindExposure::Sheltered => 0.90,
            WindExposure::Normal => 1.00,
            WindExposure::Exposed => 1.20,
        }
    }
}
