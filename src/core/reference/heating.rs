use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Heating appliance and fuel reference tables. Appliances carry either a
/// seasonal COP (electric systems, heat delivered per kWh purchased) or a
/// combustion efficiency η (heat delivered per kWh of fuel burned).

/// Fallback efficiencies when a system's entry is unusable.
pub const DEFAULT_SCOP: f64 = 1.0;
pub const DEFAULT_COMBUSTION_EFFICIENCY: f64 = 0.90;

#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FuelKind {
    Electricity,
    Gas,
    HeatingOil,
    Pellets,
    Firewood,
    Propane,
}

/// Default tariff and energy content for a fuel. Prices are overridable in
/// the input; kWh-per-unit conversions are fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelTariff {
    pub kind: FuelKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub default_price_per_unit: f64,
    pub kwh_per_unit: f64,
}

// Order must match the FuelKind discriminants; verified in tests.
pub const FUEL_TARIFFS: [FuelTariff; 6] = [
    FuelTariff {
        kind: FuelKind::Electricity,
        label: "Électricité",
        unit: "kWh",
        default_price_per_unit: 0.25,
        kwh_per_unit: 1.,
    },
    FuelTariff {
        kind: FuelKind::Gas,
        label: "Gaz naturel",
        unit: "m³",
        default_price_per_unit: 1.20,
        kwh_per_unit: 10.,
    },
    FuelTariff {
        kind: FuelKind::HeatingOil,
        label: "Fioul",
        unit: "L",
        default_price_per_unit: 1.10,
        kwh_per_unit: 10.,
    },
    FuelTariff {
        kind: FuelKind::Pellets,
        label: "Granulés",
        unit: "kg",
        default_price_per_unit: 0.38,
        kwh_per_unit: 4.8,
    },
    FuelTariff {
        kind: FuelKind::Firewood,
        label: "Bois bûches",
        unit: "stère",
        default_price_per_unit: 85.,
        kwh_per_unit: 1800.,
    },
    FuelTariff {
        kind: FuelKind::Propane,
        label: "Propane",
        unit: "L",
        default_price_per_unit: 2.10,
        kwh_per_unit: 7.1,
    },
];

impl FuelKind {
    pub fn tariff(self) -> &'static FuelTariff {
        &FUEL_TARIFFS[self as usize]
    }
}

/// Heat delivered per kWh of energy purchased: a COP for electric systems,
/// a combustion efficiency for the rest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Efficiency {
    Scop(f64),
    Combustion(f64),
}

impl Efficiency {
    /// The divisor applied to delivered heat to obtain purchased energy.
    pub fn heat_per_purchased_kwh(self) -> f64 {
        match self {
            Efficiency::Scop(cop) => cop,
            Efficiency::Combustion(eta) => eta,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrimaryHeating {
    /// Air/water heat pump; the table fallback for unknown systems.
    #[default]
    AirSourceHeatPump,
    GroundSourceHeatPump,
    DirectElectric,
    GasBoiler,
    OilBoiler,
    PelletBoiler,
    WoodStove,
    PropaneBoiler,
}

#[derive(Clone, Copy, Debug)]
pub struct HeatingSystemData {
    pub label: &'static str,
    pub fuel: FuelKind,
    pub efficiency: Efficiency,
    /// Advisory only: eligibility for MaPrimeRénov' support.
    pub subsidy_eligible: bool,
}

impl PrimaryHeating {
    pub fn data(self) -> HeatingSystemData {
        match self {
            PrimaryHeating::AirSourceHeatPump => HeatingSystemData {
                label: "Pompe à chaleur air/eau",
                fuel: FuelKind::Electricity,
                efficiency: Efficiency::Scop(3.2),
                subsidy_eligible: true,
            },
            PrimaryHeating::GroundSourceHeatPump => HeatingSystemData {
                label: "Pompe à chaleur géothermique",
                fuel: FuelKind::Electricity,
                efficiency: Efficiency::Scop(4.0),
                subsidy_eligible: true,
            },
            PrimaryHeating::DirectElectric => HeatingSystemData {
                label: "Électrique direct (convecteurs)",
                fuel: FuelKind::Electricity,
                efficiency: Efficiency::Scop(1.0),
                subsidy_eligible: false,
            },
            PrimaryHeating::GasBoiler => HeatingSystemData {
                label: "Chaudière gaz",
                fuel: FuelKind::Gas,
                efficiency: Efficiency::Combustion(0.92),
                subsidy_eligible: false,
            },
            PrimaryHeating::OilBoiler => HeatingSystemData {
                label: "Chaudière fioul",
                fuel: FuelKind::HeatingOil,
                efficiency: Efficiency::Combustion(0.85),
                subsidy_eligible: false,
            },
            PrimaryHeating::PelletBoiler => HeatingSystemData {
                label: "Chaudière à granulés",
                fuel: FuelKind::Pellets,
                efficiency: Efficiency::Combustion(0.90),
                subsidy_eligible: true,
            },
            PrimaryHeating::WoodStove => HeatingSystemData {
                label: "Poêle à bois",
                fuel: FuelKind::Firewood,
                efficiency: Efficiency::Combustion(0.65),
                subsidy_eligible: true,
            },
            PrimaryHeating::PropaneBoiler => HeatingSystemData {
                label: "Chaudière propane",
                fuel: FuelKind::Propane,
                efficiency: Efficiency::Combustion(0.90),
                subsidy_eligible: false,
            },
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecondaryHeating {
    #[default]
    None,
    WoodStove,
    PelletStove,
    Electric,
}

impl SecondaryHeating {
    /// Fraction of the total heat demand the secondary system covers by
    /// default; overridable in the input.
    pub fn default_share(self) -> f64 {
        match self {
            SecondaryHeating::None => 0.,
            SecondaryHeating::WoodStove | SecondaryHeating::PelletStove => 0.15,
            SecondaryHeating::Electric => 0.10,
        }
    }

    pub fn data(self) -> Option<HeatingSystemData> {
        match self {
            SecondaryHeating::None => None,
            SecondaryHeating::WoodStove => Some(HeatingSystemData {
                label: "Poêle à bois (appoint)",
                fuel: FuelKind::Firewood,
                efficiency: Efficiency::Combustion(0.70),
                subsidy_eligible: true,
            }),
            SecondaryHeating::PelletStove => Some(HeatingSystemData {
                label: "Poêle à granulés (appoint)",
                fuel: FuelKind::Pellets,
                efficiency: Efficiency::Combustion(0.85),
                subsidy_eligible: true,
            }),
            SecondaryHeating::Electric => Some(HeatingSystemData {
                label: "Électrique (appoint)",
                fuel: FuelKind::Electricity,
                efficiency: Efficiency::Scop(1.0),
                subsidy_eligible: false,
            }),
        }
    }
}

/// MaPrimeRénov' advisory entries surfaced in the report when a selected
/// system is subsidy-eligible. Amounts are indicative strings, never used
/// in arithmetic.
pub const SUBSIDY_MEASURES: [(&str, &str); 8] = [
    ("Isolation de la toiture", "€15-25/m²"),
    ("Isolation des murs (intérieur)", "€15-25/m²"),
    ("Isolation des murs (extérieur)", "€40-75/m²"),
    ("Pompe à chaleur air/eau", "€2 000-5 000"),
    ("Pompe à chaleur géothermique", "€5 000-11 000"),
    ("Vitrage haute performance", "€40-100/fenêtre"),
    ("Chaudière à granulés", "€1 500-5 500"),
    ("Poêle à bois (insert)", "€800-2 500"),
];
