use crate::core::reference::archetype::HouseArchetype;
use crate::core::reference::behavior::{HeatingSchedule, Occupancy, WindExposure};
use crate::core::reference::climate::{ClimateZoneId, PvOrientation};
use crate::core::reference::heating::{FuelKind, PrimaryHeating, SecondaryHeating};
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::Read;

/// The calculation input: one immutable snapshot of everything the wizard
/// collects. Every selection is a typed enum; every optional section falls
/// back to documented defaults. Out-of-range numbers are clamped during
/// scenario resolution, not rejected here.

pub const DEFAULT_BASELINE_ELECTRICITY_KWH: f64 = 3_500.;
pub const DEFAULT_POOL_VOLUME_M3: f64 = 50.;
pub const DEFAULT_EV_KWH_PER_100KM: f64 = 17.;
pub const DEFAULT_EV_CHARGING_LOSS: f64 = 0.10;

pub fn ingest_for_processing(json: impl Read) -> Result<CalculationInput, anyhow::Error> {
    Ok(serde_json::from_reader(json)?)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CalculationInput {
    pub building: BuildingInput,
    #[serde(default)]
    pub location: LocationInput,
    #[serde(default)]
    pub insulation: InsulationInput,
    #[serde(default)]
    pub envelope: EnvelopeOverrides,
    #[serde(default)]
    pub heating: HeatingInput,
    #[serde(default)]
    pub behavior: BehaviorInput,
    /// Price overrides per fuel kind, in € per billing unit.
    #[serde(default)]
    pub prices: IndexMap<FuelKind, f64>,
    pub photovoltaics: Option<PvInput>,
    pub pool: Option<PoolInput>,
    pub electric_vehicle: Option<EvInput>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct BuildingInput {
    /// Habitable floor area in m²; clamped to [20, 600] on resolution.
    pub floor_area: f64,
    #[serde(default = "default_floor_count")]
    pub floors: u32,
    /// Metres; the 2.5 m default applies when absent.
    pub ceiling_height: Option<f64>,
    #[serde(default)]
    pub archetype: HouseArchetype,
    #[serde(default)]
    pub wind_exposure: WindExposure,
    /// Volume fractions per hour; archetype default applies when absent.
    pub air_change_rate: Option<f64>,
}

fn default_floor_count() -> u32 {
    1
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct LocationInput {
    /// Five-digit postal code, resolved to a zone by department prefix.
    pub postal_code: Option<String>,
    /// Explicit zone override; wins over the postal code.
    pub climate_zone: Option<ClimateZoneId>,
}

/// Insulation levels per envelope element. An absent level is seeded from
/// the archetype default U-value by nearest match.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct InsulationInput {
    pub windows: Option<crate::core::reference::insulation::GlazingLevel>,
    pub roof: Option<crate::core::reference::insulation::RoofInsulation>,
    pub walls: Option<crate::core::reference::insulation::WallInsulation>,
    pub floor: Option<crate::core::reference::insulation::FloorInsulation>,
}

/// Field-level envelope overrides: each present value locks out the
/// derived archetype/insulation value for that field.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct EnvelopeOverrides {
    pub window_u: Option<f64>,
    pub roof_u: Option<f64>,
    pub wall_u: Option<f64>,
    pub floor_u: Option<f64>,
    pub window_area: Option<f64>,
    pub roof_area: Option<f64>,
    pub wall_area: Option<f64>,
    pub floor_area: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct HeatingInput {
    #[serde(default)]
    pub primary: PrimaryHeating,
    /// Overrides the table SCOP/η; clamped to a plausible range.
    pub primary_efficiency: Option<f64>,
    #[serde(default)]
    pub secondary: SecondaryHeating,
    /// Overrides the secondary's default heat-demand share, in [0, 0.5].
    pub secondary_share: Option<f64>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct BehaviorInput {
    #[serde(default)]
    pub schedule: HeatingSchedule,
    #[serde(default)]
    pub occupancy: Occupancy,
    /// Whether the usage/behavior step has been confirmed; narrows the
    /// uncertainty band from ±20% to ±12%.
    #[serde(default)]
    pub usage_confirmed: bool,
    #[serde(default = "default_baseline_electricity")]
    pub baseline_electricity_kwh: f64,
}

impl Default for BehaviorInput {
    fn default() -> Self {
        Self {
            schedule: HeatingSchedule::default(),
            occupancy: Occupancy::default(),
            usage_confirmed: false,
            baseline_electricity_kwh: DEFAULT_BASELINE_ELECTRICITY_KWH,
        }
    }
}

fn default_baseline_electricity() -> f64 {
    DEFAULT_BASELINE_ELECTRICITY_KWH
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PvInput {
    /// Installed capacity in kWp.
    pub capacity_kwp: f64,
    #[serde(default)]
    pub orientation: PvOrientation,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PoolInput {
    #[serde(default = "default_pool_volume")]
    pub volume_m3: f64,
}

fn default_pool_volume() -> f64 {
    DEFAULT_POOL_VOLUME_M3
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct EvInput {
    pub km_per_year: f64,
    #[serde(default = "default_ev_consumption")]
    pub kwh_per_100km: f64,
    #[serde(default = "default_charging_loss")]
    pub charging_loss: f64,
}

fn default_ev_consumption() -> f64 {
    DEFAULT_EV_KWH_PER_100KM
}

fn default_charging_loss() -> f64 {
    DEFAULT_EV_CHARGING_LOSS
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    #[rstest]
    fn minimal_input_gets_documented_defaults() {
        let input: CalculationInput =
            serde_json::from_value(json!({"building": {"floor_area": 120}})).unwrap();
        assert_eq!(input.building.floors, 1);
        assert_eq!(input.building.archetype, HouseArchetype::Traditional);
        assert_eq!(input.building.wind_exposure, WindExposure::Normal);
        assert_eq!(input.heating.primary, PrimaryHeating::AirSourceHeatPump);
        assert_eq!(input.heating.secondary, SecondaryHeating::None);
        assert_eq!(input.behavior.schedule, HeatingSchedule::DayNight);
        assert_eq!(input.behavior.occupancy, Occupancy::Permanent);
        assert_eq!(
            input.behavior.baseline_electricity_kwh,
            DEFAULT_BASELINE_ELECTRICITY_KWH
        );
        assert!(!input.behavior.usage_confirmed);
        assert!(input.photovoltaics.is_none());
        assert!(input.pool.is_none());
        assert!(input.electric_vehicle.is_none());
    }

    #[rstest]
    fn full_input_deserializes_with_typed_selections() {
        let input: CalculationInput = serde_json::from_value(json!({
            "building": {
                "floor_area": 95,
                "floors": 2,
                "ceiling_height": 2.7,
                "archetype": "old_stone",
                "wind_exposure": "exposed"
            },
            "location": {"postal_code": "33100"},
            "insulation": {"windows": "double_low_e", "roof": "good"},
            "envelope": {"wall_u": 0.5, "wall_area": 110},
            "heating": {
                "primary": "gas_boiler",
                "secondary": "wood_stove",
                "secondary_share": 0.2
            },
            "behavior": {"schedule": "frugal", "usage_confirmed": true},
            "prices": {"electricity": 0.28, "gas": 1.35},
            "photovoltaics": {"capacity_kwp": 3, "orientation": "south_west"},
            "pool": {"volume_m3": 40},
            "electric_vehicle": {"km_per_year": 12000}
        }))
        .unwrap();
        assert_eq!(input.building.archetype, HouseArchetype::OldStone);
        assert_eq!(input.heating.primary, PrimaryHeating::GasBoiler);
        assert_eq!(input.heating.secondary_share, Some(0.2));
        assert_eq!(input.prices[&FuelKind::Gas], 1.35);
        assert_eq!(
            input.photovoltaics.unwrap().orientation,
            PvOrientation::SouthWest
        );
        assert_eq!(
            input.electric_vehicle.unwrap().kwh_per_100km,
            DEFAULT_EV_KWH_PER_100KM
        );
    }

    #[rstest]
    fn unknown_fields_are_rejected() {
        let result: Result<CalculationInput, _> =
            serde_json::from_value(json!({"building": {"floor_area": 120, "surface": 10}}));
        assert!(result.is_err());
    }

    #[rstest]
    fn ingest_reads_from_any_reader() {
        let input =
            ingest_for_processing(r#"{"building": {"floor_area": 60}}"#.as_bytes()).unwrap();
        assert_eq!(input.building.floor_area, 60.);
    }
}
