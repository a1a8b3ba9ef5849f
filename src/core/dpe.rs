use crate::core::units::MIN_DPE_REFERENCE_AREA;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Indicative DPE classification: a kWh/m²/year intensity mapped onto the
/// A-G ladder by threshold lookup. Pure and stateless; always recomputed,
/// never persisted.

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum DpeClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl DpeClass {
    /// Upper intensity bound of the grade in kWh/m²/year; G is open-ended.
    pub fn upper_threshold(self) -> Option<f64> {
        match self {
            DpeClass::A => Some(70.),
            DpeClass::B => Some(110.),
            DpeClass::C => Some(180.),
            DpeClass::D => Some(250.),
            DpeClass::E => Some(330.),
            DpeClass::F => Some(420.),
            DpeClass::G => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DpeClass::A => "très performant",
            DpeClass::B => "performant",
            DpeClass::C => "assez performant",
            DpeClass::D => "moyen",
            DpeClass::E => "énergivore",
            DpeClass::F => "très énergivore",
            DpeClass::G => "extrêmement énergivore",
        }
    }

    /// French letting restrictions attached to the worst grades.
    pub fn rental_ban(self) -> Option<&'static str> {
        match self {
            DpeClass::E => Some("interdit à la location à partir du 1-1-2034"),
            DpeClass::F => Some("interdit à la location à partir du 1-1-2028"),
            DpeClass::G => Some("interdit à la location depuis le 1-1-2025"),
            _ => None,
        }
    }

    fn one_better(self) -> DpeClass {
        DpeClass::iter()
            .rev()
            .find(|class| class < &self)
            .unwrap_or(self)
    }

    fn one_worse(self) -> DpeClass {
        DpeClass::iter().find(|class| class > &self).unwrap_or(self)
    }
}

/// Map an intensity onto the first grade whose threshold it does not
/// exceed. Boundary values classify to the better grade (70.0 is an A);
/// anything unusable lands in G.
pub fn classify(intensity_kwh_per_m2: f64) -> DpeClass {
    if !intensity_kwh_per_m2.is_finite() {
        return DpeClass::G;
    }
    DpeClass::iter()
        .find(|class| {
            class
                .upper_threshold()
                .map_or(true, |threshold| intensity_kwh_per_m2 <= threshold)
        })
        .unwrap_or(DpeClass::G)
}

/// Intensity in kWh/m²/year; the floor-area denominator is never taken
/// below 20 m².
pub fn intensity(total_kwh: f64, floor_area: f64) -> f64 {
    total_kwh.max(0.) / floor_area.max(MIN_DPE_REFERENCE_AREA)
}

/// A grade widened one notch each way, clamped to the ends of the ladder,
/// for display as an uncertainty range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DpeBand {
    pub low: DpeClass,
    pub high: DpeClass,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DpeRating {
    pub intensity_kwh_per_m2: f64,
    pub class: DpeClass,
    pub band: DpeBand,
    pub rental_ban: Option<&'static str>,
}

pub fn rate(total_kwh: f64, floor_area: f64) -> DpeRating {
    let intensity_kwh_per_m2 = intensity(total_kwh, floor_area);
    let class = classify(intensity_kwh_per_m2);
    DpeRating {
        intensity_kwh_per_m2,
        class,
        band: DpeBand {
            low: class.one_better(),
            high: class.one_worse(),
        },
        rental_ban: class.rental_ban(),
    }
}
