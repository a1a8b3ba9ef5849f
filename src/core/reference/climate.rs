use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum_macros::{Display, EnumIter};

/// Climate reference data: the six heating zones used for metropolitan
/// France, with annual heating-degree-days and photovoltaic yield, plus
/// the department-prefix lookup that resolves a postal code to a zone.

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClimateZoneId {
    Mediterranean,
    Atlantic,
    ParisNorth,
    Centre,
    East,
    Mountain,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateZone {
    pub id: ClimateZoneId,
    pub name: &'static str,
    pub description: &'static str,
    /// Annual heating-degree-days, in °C·day.
    pub heating_degree_days: u32,
    /// Annual photovoltaic yield for this zone, in kWh per kWp installed.
    pub pv_yield_kwh_per_kwp: f64,
}

/// Mid-severity fallback whenever a zone cannot be resolved.
pub const DEFAULT_ZONE_ID: ClimateZoneId = ClimateZoneId::Centre;

// Order must match the ClimateZoneId discriminants; verified in tests.
pub const CLIMATE_ZONES: [ClimateZone; 6] = [
    ClimateZone {
        id: ClimateZoneId::Mediterranean,
        name: "Méditerranée",
        description: "coast and hinterland",
        heating_degree_days: 1400,
        pv_yield_kwh_per_kwp: 1450.,
    },
    ClimateZone {
        id: ClimateZoneId::Atlantic,
        name: "Atlantique / Sud-Ouest",
        description: "Bordeaux, Bretagne",
        heating_degree_days: 1900,
        pv_yield_kwh_per_kwp: 1250.,
    },
    ClimateZone {
        id: ClimateZoneId::ParisNorth,
        name: "Île-de-France / Nord",
        description: "Paris, Lille",
        heating_degree_days: 2200,
        pv_yield_kwh_per_kwp: 1150.,
    },
    ClimateZone {
        id: ClimateZoneId::Centre,
        name: "Centre / Bourgogne",
        description: "Lyon, Dijon",
        heating_degree_days: 2500,
        pv_yield_kwh_per_kwp: 1200.,
    },
    ClimateZone {
        id: ClimateZoneId::East,
        name: "Est / Alsace",
        description: "Strasbourg, Nancy",
        heating_degree_days: 2800,
        pv_yield_kwh_per_kwp: 1150.,
    },
    ClimateZone {
        id: ClimateZoneId::Mountain,
        name: "Montagne",
        description: "Alpes, Pyrénées",
        heating_degree_days: 3400,
        pv_yield_kwh_per_kwp: 1100.,
    },
];

impl ClimateZoneId {
    pub fn zone(self) -> &'static ClimateZone {
        &CLIMATE_ZONES[self as usize]
    }
}

static DEPARTMENT_TO_ZONE: LazyLock<IndexMap<&'static str, ClimateZoneId>> = LazyLock::new(|| {
    use ClimateZoneId::*;
    IndexMap::from([
        // Méditerranée (Corsica included under the "20" prefix)
        ("04", Mediterranean),
        ("05", Mediterranean),
        ("06", Mediterranean),
        ("11", Mediterranean),
        ("13", Mediterranean),
        ("30", Mediterranean),
        ("34", Mediterranean),
        ("66", Mediterranean),
        ("83", Mediterranean),
        ("84", Mediterranean),
        ("20", Mediterranean),
        // Atlantic / south-west
        ("16", Atlantic),
        ("17", Atlantic),
        ("24", Atlantic),
        ("33", Atlantic),
        ("40", Atlantic),
        ("47", Atlantic),
        ("64", Atlantic),
        ("79", Atlantic),
        ("85", Atlantic),
        ("86", Atlantic),
        ("87", Atlantic),
        ("44", Atlantic),
        ("56", Atlantic),
        ("29", Atlantic),
        ("22", Atlantic),
        ("35", Atlantic),
        ("49", Atlantic),
        ("50", Atlantic),
        ("14", Atlantic),
        ("53", Atlantic),
        ("72", Atlantic),
        ("41", Atlantic),
        ("37", Atlantic),
        // Mountains
        ("09", Mountain),
        ("12", Mountain),
        ("15", Mountain),
        ("19", Mountain),
        ("31", Mountain),
        ("32", Mountain),
        ("38", Mountain),
        ("42", Mountain),
        ("43", Mountain),
        ("46", Mountain),
        ("48", Mountain),
        ("63", Mountain),
        ("65", Mountain),
        ("73", Mountain),
        ("74", Mountain),
        ("81", Mountain),
        ("82", Mountain),
        // East
        ("08", East),
        ("10", East),
        ("25", East),
        ("39", East),
        ("52", East),
        ("54", East),
        ("55", East),
        ("57", East),
        ("67", East),
        ("68", East),
        ("70", East),
        ("88", East),
        ("90", East),
        ("21", East),
        ("71", East),
        // Île-de-France / north
        ("75", ParisNorth),
        ("77", ParisNorth),
        ("78", ParisNorth),
        ("91", ParisNorth),
        ("92", ParisNorth),
        ("93", ParisNorth),
        ("94", ParisNorth),
        ("95", ParisNorth),
        ("59", ParisNorth),
        ("62", ParisNorth),
        ("60", ParisNorth),
        ("80", ParisNorth),
        ("02", ParisNorth),
        ("51", ParisNorth),
        ("76", ParisNorth),
        ("27", ParisNorth),
        ("28", ParisNorth),
        ("45", ParisNorth),
    ])
});

/// Resolve a five-digit postal code to a climate zone via its department
/// prefix. Malformed codes resolve to nothing (the caller keeps whatever
/// zone it already had); a well-formed code with an unmapped prefix
/// resolves to the default zone.
pub fn zone_for_postal_code(postal_code: &str) -> Option<ClimateZoneId> {
    let code = postal_code.trim();
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        DEPARTMENT_TO_ZONE
            .get(&code[..2])
            .copied()
            .unwrap_or(DEFAULT_ZONE_ID),
    )
}

/// Compass orientation of a photovoltaic array, with a flat derate factor
/// on the zone yield.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PvOrientation {
    #[default]
    South,
    SouthEast,
    SouthWest,
    East,
    West,
    NorthEast,
    NorthWest,
    North,
}

impl PvOrientation {
    pub fn yield_factor(self) -> f64 {
        match self {
            PvOrientation::South => 1.00,
            PvOrientation::SouthEast | PvOrientation::SouthWest => 0.95,
            PvOrientation::East | PvOrientation::West => 0.85,
            PvOrientation::NorthEast | PvOrientation::NorthWest => 0.70,
            PvOrientation::North => 0.55,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use strum::IntoEnumIterator;

    #[rstest]
    fn zone_table_is_aligned_with_enum_discriminants() {
        for id in ClimateZoneId::iter() {
            assert_eq!(id.zone().id, id);
        }
    }

    #[rstest]
    #[case("33100", ClimateZoneId::Atlantic)]
    #[case("75001", ClimateZoneId::ParisNorth)]
    #[case("67000", ClimateZoneId::East)]
    #[case("06000", ClimateZoneId::Mediterranean)]
    #[case("73000", ClimateZoneId::Mountain)]
    #[case("21000", ClimateZoneId::East)]
    fn postal_codes_resolve_to_expected_zones(
        #[case] postal_code: &str,
        #[case] expected: ClimateZoneId,
    ) {
        assert_eq!(zone_for_postal_code(postal_code), Some(expected));
    }

    #[rstest]
    fn unmapped_department_falls_back_to_default_zone() {
        assert_eq!(zone_for_postal_code("99123"), Some(DEFAULT_ZONE_ID));
    }

    #[rstest]
    #[case("331")]
    #[case("33 100")]
    #[case("3310O")]
    #[case("")]
    fn malformed_postal_codes_resolve_to_nothing(#[case] postal_code: &str) {
        assert_eq!(zone_for_postal_code(postal_code), None);
    }

    #[rstest]
    fn orientation_factors_are_within_documented_bounds() {
        for orientation in PvOrientation::iter() {
            let factor = orientation.yield_factor();
            assert!((0.55..=1.0).contains(&factor));
        }
    }

    #[rstest]
    fn default_zone_is_mid_severity() {
        assert_eq!(DEFAULT_ZONE_ID.zone().heating_degree_days, 2500);
    }
}
