use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// House archetypes seed envelope defaults by construction era. They are
/// only ever a starting point: once a specific U-value or area is given in
/// the input, the archetype value for that field is ignored.

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HouseArchetype {
    /// Pre-1948 solid stone walls.
    OldStone,
    /// 1948-1990, breeze block or brick.
    #[default]
    Traditional,
    /// 1990-2012, first thermal regulations (RT1990/2000/2005).
    Recent,
    /// Post-2012, RT2012 or RE2020.
    Modern,
    /// Shared walls and floors, less exposed envelope.
    Apartment,
}

/// Default U-values (W/m²·K) and air-change rate (1/h) for an archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArchetypeDefaults {
    pub window_u: f64,
    pub roof_u: f64,
    pub wall_u: f64,
    pub floor_u: f64,
    pub air_change_rate: f64,
}

/// Envelope-area ratios. Window and wall factors apply to the floor area;
/// roof and floor factors apply to the footprint (floor area / floors).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaFactors {
    pub window: f64,
    pub roof: f64,
    pub wall: f64,
    pub floor: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct ArchetypeData {
    pub archetype: HouseArchetype,
    pub label: &'static str,
    pub period: &'static str,
    pub defaults: ArchetypeDefaults,
    pub area_factors: AreaFactors,
    pub advisory: &'static str,
}

// Order must match the HouseArchetype discriminants; verified in tests.
pub const ARCHETYPES: [ArchetypeData; 5] = [
    ArchetypeData {
        archetype: HouseArchetype::OldStone,
        label: "Maison ancienne en pierre",
        period: "avant 1948",
        defaults: ArchetypeDefaults {
            window_u: 5.8,
            roof_u: 3.0,
            wall_u: 2.0,
            floor_u: 1.2,
            air_change_rate: 0.8,
        },
        area_factors: AreaFactors {
            window: 0.12,
            roof: 0.55,
            wall: 1.4,
            floor: 0.55,
        },
        advisory: "50-80 cm of solid stone looks well insulated but only reaches R≈0.8 m²·K/W; \
                   slow to heat up and to cool down.",
    },
    ArchetypeData {
        archetype: HouseArchetype::Traditional,
        label: "Maison traditionnelle",
        period: "1948-1990",
        defaults: ArchetypeDefaults {
            window_u: 2.9,
            roof_u: 1.5,
            wall_u: 1.2,
            floor_u: 0.8,
            air_change_rate: 0.6,
        },
        area_factors: AreaFactors {
            window: 0.15,
            roof: 0.50,
            wall: 1.2,
            floor: 0.50,
        },
        advisory: "Breeze block (parpaing) insulates poorly: R=0.22 for 20 cm. Often some \
                   insulation added later.",
    },
    ArchetypeData {
        archetype: HouseArchetype::Recent,
        label: "Maison récente",
        period: "1990-2012",
        defaults: ArchetypeDefaults {
            window_u: 1.8,
            roof_u: 0.3,
            wall_u: 0.5,
            floor_u: 0.5,
            air_change_rate: 0.5,
        },
        area_factors: AreaFactors {
            window: 0.16,
            roof: 0.50,
            wall: 1.1,
            floor: 0.50,
        },
        advisory: "First generation of thermal regulations.",
    },
    ArchetypeData {
        archetype: HouseArchetype::Modern,
        label: "Maison moderne",
        period: "après 2012",
        defaults: ArchetypeDefaults {
            window_u: 1.4,
            roof_u: 0.18,
            wall_u: 0.25,
            floor_u: 0.3,
            air_change_rate: 0.4,
        },
        area_factors: AreaFactors {
            window: 0.18,
            roof: 0.50,
            wall: 1.0,
            floor: 0.50,
        },
        advisory: "RT2012/RE2020: strict insulation requirements, very energy efficient.",
    },
    ArchetypeData {
        archetype: HouseArchetype::Apartment,
        label: "Appartement",
        period: "variable",
        defaults: ArchetypeDefaults {
            window_u: 2.5,
            roof_u: 0.5,
            wall_u: 1.0,
            floor_u: 0.5,
            air_change_rate: 0.5,
        },
        area_factors: AreaFactors {
            window: 0.12,
            roof: 0.15,
            wall: 0.6,
            floor: 0.15,
        },
        advisory: "Shared walls and floors mean less heat loss through the envelope.",
    },
];

impl HouseArchetype {
    pub fn data(self) -> &'static ArchetypeData {
        &ARCHETYPES[self as usize]
    }
}

/// Envelope areas estimated from archetype ratios, in whole m².
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EstimatedAreas {
    pub window: f64,
    pub roof: f64,
    pub wall: f64,
    pub floor: f64,
}

/// Estimate the four envelope areas from floor area, floor count and
/// archetype. Roof and ground-floor areas scale with the footprint, not
/// the total floor area.
pub fn estimate_envelope_areas(
    floor_area: f64,
    floors: u32,
    archetype: HouseArchetype,
) -> EstimatedAreas {
    let factors = &archetype.data().area_factors;
    let footprint = floor_area / floors.max(1) as f64;
    EstimatedAreas {
        window: (floor_area * factors.window).round(),
        roof: (footprint * factors.roof).round(),
        wall: (floor_area * factors.wall).round(),
        floor: (footprint * factors.floor).round(),
    }
}
