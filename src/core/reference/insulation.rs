use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Insulation levels per envelope element, each carrying a representative
/// U-value (W/m²·K). Archetype default U-values are mapped onto the
/// closest level by minimum absolute difference; tables are small enough
/// that a linear scan is all that is needed.

fn nearest<T: IntoEnumIterator + Copy>(u_value: f64, u_of: impl Fn(T) -> f64) -> T {
    T::iter()
        .min_by_key(|level| OrderedFloat((u_of(*level) - u_value).abs()))
        .expect("insulation level enums are non-empty")
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GlazingLevel {
    /// Single pane.
    Single,
    /// Double glazing from before ~2000.
    DoubleOld,
    /// Low-emissivity double glazing.
    DoubleLowE,
    /// HR++ or triple glazing, current new-build standard.
    HighPerformance,
}

impl GlazingLevel {
    pub fn u_value(self) -> f64 {
        match self {
            GlazingLevel::Single => 5.8,
            GlazingLevel::DoubleOld => 2.9,
            GlazingLevel::DoubleLowE => 1.8,
            GlazingLevel::HighPerformance => 1.2,
        }
    }

    pub fn nearest_to(u_value: f64) -> Self {
        nearest(u_value, Self::u_value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoofInsulation {
    None,
    /// 5-10 cm.
    Moderate,
    /// 15-20 cm, R≈5, renovation standard.
    Good,
    /// More than 25 cm, new-build level.
    VeryGood,
}

impl RoofInsulation {
    pub fn u_value(self) -> f64 {
        match self {
            RoofInsulation::None => 3.0,
            RoofInsulation::Moderate => 0.8,
            RoofInsulation::Good => 0.3,
            RoofInsulation::VeryGood => 0.18,
        }
    }

    pub fn nearest_to(u_value: f64) -> Self {
        nearest(u_value, Self::u_value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WallInsulation {
    None,
    /// 3-6 cm.
    Moderate,
    /// 10-15 cm, R≈3.5.
    Good,
    /// More than 18 cm, new-build level.
    VeryGood,
}

impl WallInsulation {
    pub fn u_value(self) -> f64 {
        match self {
            WallInsulation::None => 2.0,
            WallInsulation::Moderate => 0.8,
            WallInsulation::Good => 0.35,
            WallInsulation::VeryGood => 0.20,
        }
    }

    pub fn nearest_to(u_value: f64) -> Self {
        nearest(u_value, Self::u_value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FloorInsulation {
    /// Directly on the ground.
    None,
    /// Insulated crawl space.
    Moderate,
    /// Modern floor insulation, R≈4.
    Good,
}

impl FloorInsulation {
    pub fn u_value(self) -> f64 {
        match self {
            FloorInsulation::None => 1.2,
            FloorInsulation::Moderate => 0.5,
            FloorInsulation::Good => 0.25,
        }
    }

    pub fn nearest_to(u_value: f64) -> Self {
        nearest(u_value, Self::u_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::archetype::HouseArchetype;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(5.8, GlazingLevel::Single)]
    #[case(2.9, GlazingLevel::DoubleOld)]
    #[case(2.4, GlazingLevel::DoubleOld)]
    #[case(1.4, GlazingLevel::HighPerformance)]
    #[case(0.8, GlazingLevel::HighPerformance)]
    fn glazing_matches_nearest_u_value(#[case] u_value: f64, #[case] expected: GlazingLevel) {
        assert_eq!(GlazingLevel::nearest_to(u_value), expected);
    }

    #[rstest]
    fn traditional_archetype_defaults_map_to_expected_levels() {
        let defaults = HouseArchetype::Traditional.data().defaults;
        assert_eq!(
            GlazingLevel::nearest_to(defaults.window_u),
            GlazingLevel::DoubleOld
        );
        assert_eq!(
            RoofInsulation::nearest_to(defaults.roof_u),
            RoofInsulation::Moderate
        );
        assert_eq!(
            WallInsulation::nearest_to(defaults.wall_u),
            WallInsulation::Moderate
        );
        assert_eq!(
            FloorInsulation::nearest_to(defaults.floor_u),
            FloorInsulation::Moderate
        );
    }

    #[rstest]
    fn old_stone_archetype_defaults_map_to_uninsulated_levels() {
        let defaults = HouseArchetype::OldStone.data().defaults;
        assert_eq!(
            GlazingLevel::nearest_to(defaults.window_u),
            GlazingLevel::Single
        );
        assert_eq!(
            RoofInsulation::nearest_to(defaults.roof_u),
            RoofInsulation::None
        );
        assert_eq!(
            WallInsulation::nearest_to(defaults.wall_u),
            WallInsulation::None
        );
        assert_eq!(
            FloorInsulation::nearest_to(defaults.floor_u),
            FloorInsulation::None
        );
    }

    #[rstest]
    fn equidistant_u_value_matches_first_declared_level() {
        // 1.9 is equidistant from 3.0 (none) and 0.8 (moderate); ties go to
        // the earlier table entry.
        assert_eq!(RoofInsulation::nearest_to(1.9), RoofInsulation::None);
    }
}
