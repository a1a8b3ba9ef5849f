use crate::core::cost::{
    aggregate_costs, ev_annual_kwh, pool_annual_kwh, CostBreakdown, CostParameters,
};
use crate::core::dpe::{rate, DpeRating};
use crate::core::heat_demand::{annual_heat_demand, Envelope, EnvelopeElement, HeatDemand};
use crate::core::reference::archetype::{estimate_envelope_areas, ArchetypeData, HouseArchetype};
use crate::core::reference::behavior::{HeatingSchedule, Occupancy, WindExposure};
use crate::core::reference::climate::{
    zone_for_postal_code, ClimateZone, ClimateZoneId, PvOrientation, DEFAULT_ZONE_ID,
};
use crate::core::reference::heating::{Efficiency, FuelKind, HeatingSystemData};
use crate::core::reference::insulation::{
    FloorInsulation, GlazingLevel, RoofInsulation, WallInsulation,
};
use crate::core::units::{DEFAULT_CEILING_HEIGHT, MAX_FLOOR_AREA, MIN_FLOOR_AREA};
use crate::input::CalculationInput;
use indexmap::IndexMap;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// A scenario is the fully resolved snapshot of one calculation: every
/// zone/archetype/insulation/system/price lookup is performed exactly once
/// here, under the resolve-with-fallback policy, so the computation stages
/// themselves never fail. Re-resolved from scratch on every input change;
/// nothing is cached between runs.

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ResolvedBuilding {
    pub floor_area: f64,
    pub floors: u32,
    pub ceiling_height: f64,
    pub volume: f64,
    pub wind_exposure: WindExposure,
    /// Air-change rate after the wind-exposure factor, in 1/h.
    pub air_change_rate: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ResolvedPv {
    pub capacity_kwp: f64,
    pub orientation: PvOrientation,
    pub generation_kwh: f64,
}

/// Everything the transparency report echoes back about the resolution.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedInputs {
    pub zone: ClimateZoneId,
    pub zone_name: &'static str,
    pub heating_degree_days: u32,
    pub archetype: HouseArchetype,
    pub archetype_label: &'static str,
    pub building: ResolvedBuilding,
    pub envelope: Envelope,
    pub schedule: HeatingSchedule,
    pub occupancy: Occupancy,
    pub baseline_kwh: f64,
    pub pool_kwh: f64,
    pub ev_kwh: f64,
    pub pv: Option<ResolvedPv>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunResults {
    pub resolved: ResolvedInputs,
    pub heat_demand: HeatDemand,
    pub costs: CostBreakdown,
    pub dpe: DpeRating,
}

#[derive(Clone, Debug)]
pub struct Scenario {
    pub zone: &'static ClimateZone,
    pub archetype: &'static ArchetypeData,
    pub building: ResolvedBuilding,
    pub envelope: Envelope,
    pub primary: HeatingSystemData,
    pub secondary: Option<(HeatingSystemData, f64)>,
    pub schedule: HeatingSchedule,
    pub occupancy: Occupancy,
    pub usage_confirmed: bool,
    pub baseline_kwh: f64,
    pub pool_kwh: f64,
    pub ev_kwh: f64,
    pub pv: Option<ResolvedPv>,
    pub prices: IndexMap<FuelKind, f64>,
}

impl Scenario {
    pub fn from_input(input: &CalculationInput) -> Self {
        let zone = resolve_zone(input).zone();

        let archetype = input.building.archetype.data();
        let floor_area = clamp_with_log(
            input.building.floor_area,
            MIN_FLOOR_AREA,
            MAX_FLOOR_AREA,
            "floor_area",
        );
        let floors = input.building.floors.max(1);
        let ceiling_height = match input.building.ceiling_height {
            Some(height) if height.is_finite() && height > 0. => {
                clamp_with_log(height, 2.0, 5.0, "ceiling_height")
            }
            Some(_) | None => DEFAULT_CEILING_HEIGHT,
        };
        let volume = floor_area * ceiling_height * floors as f64;
        let base_air_change_rate = match input.building.air_change_rate {
            Some(ach) if ach.is_finite() && ach >= 0. => ach,
            Some(ach) => {
                warn!("unusable air-change rate {ach}, using archetype default");
                archetype.defaults.air_change_rate
            }
            None => archetype.defaults.air_change_rate,
        };
        let building = ResolvedBuilding {
            floor_area,
            floors,
            ceiling_height,
            volume,
            wind_exposure: input.building.wind_exposure,
            air_change_rate: base_air_change_rate
                * input.building.wind_exposure.air_change_factor(),
        };

        let envelope = resolve_envelope(input, archetype, floor_area, floors);

        let primary = resolve_efficiency_override(
            input.heating.primary.data(),
            input.heating.primary_efficiency,
        );
        let secondary = input.heating.secondary.data().map(|system| {
            let share = match input.heating.secondary_share {
                Some(share) if share.is_finite() => clamp_with_log(share, 0., 0.5, "secondary_share"),
                Some(_) => input.heating.secondary.default_share(),
                None => input.heating.secondary.default_share(),
            };
            (system, share)
        });

        let prices = resolve_prices(&input.prices);

        let baseline_kwh = clamp_with_log(
            input.behavior.baseline_electricity_kwh,
            500.,
            15_000.,
            "baseline_electricity_kwh",
        );
        let pool_kwh = input
            .pool
            .map(|pool| pool_annual_kwh(clamp_with_log(pool.volume_m3, 10., 200., "pool volume")))
            .unwrap_or(0.);
        let ev_kwh = input
            .electric_vehicle
            .map(|ev| ev_annual_kwh(ev.km_per_year, ev.kwh_per_100km, ev.charging_loss))
            .unwrap_or(0.);

        let pv = input.photovoltaics.map(|pv| {
            let capacity_kwp = pv.capacity_kwp.max(0.);
            ResolvedPv {
                capacity_kwp,
                orientation: pv.orientation,
                generation_kwh: capacity_kwp
                    * zone.pv_yield_kwh_per_kwp
                    * pv.orientation.yield_factor(),
            }
        });

        Self {
            zone,
            archetype,
            building,
            envelope,
            primary,
            secondary,
            schedule: input.behavior.schedule,
            occupancy: input.behavior.occupancy,
            usage_confirmed: input.behavior.usage_confirmed,
            baseline_kwh,
            pool_kwh,
            ev_kwh,
            pv,
            prices,
        }
    }

    /// Run the three computation stages over this snapshot. Pure: same
    /// scenario, same results.
    pub fn run(&self) -> RunResults {
        let heat_demand = annual_heat_demand(
            &self.envelope,
            self.building.air_change_rate,
            self.building.volume,
            self.zone,
            self.schedule.factor(),
            self.occupancy.factor(),
        );
        let costs = aggregate_costs(CostParameters {
            heat_demand_kwh: heat_demand.demand_kwh,
            primary: self.primary,
            secondary: self.secondary,
            baseline_kwh: self.baseline_kwh,
            pool_kwh: self.pool_kwh,
            ev_kwh: self.ev_kwh,
            pv_generation_kwh: self.pv.map(|pv| pv.generation_kwh),
            prices: &self.prices,
            usage_confirmed: self.usage_confirmed,
        });
        let dpe = rate(costs.total_relevant_kwh, self.building.floor_area);
        RunResults {
            resolved: ResolvedInputs {
                zone: self.zone.id,
                zone_name: self.zone.name,
                heating_degree_days: self.zone.heating_degree_days,
                archetype: self.archetype.archetype,
                archetype_label: self.archetype.label,
                building: self.building,
                envelope: self.envelope,
                schedule: self.schedule,
                occupancy: self.occupancy,
                baseline_kwh: self.baseline_kwh,
                pool_kwh: self.pool_kwh,
                ev_kwh: self.ev_kwh,
                pv: self.pv,
            },
            heat_demand,
            costs,
            dpe,
        }
    }
}

fn resolve_zone(input: &CalculationInput) -> ClimateZoneId {
    if let Some(zone) = input.location.climate_zone {
        return zone;
    }
    match input.location.postal_code.as_deref() {
        Some(code) => match zone_for_postal_code(code) {
            Some(zone) => zone,
            None => {
                debug!("postal code {code:?} is malformed, using default zone");
                DEFAULT_ZONE_ID
            }
        },
        None => DEFAULT_ZONE_ID,
    }
}

fn resolve_envelope(
    input: &CalculationInput,
    archetype: &ArchetypeData,
    floor_area: f64,
    floors: u32,
) -> Envelope {
    let defaults = &archetype.defaults;
    let areas = estimate_envelope_areas(floor_area, floors, archetype.archetype);
    let overrides = &input.envelope;
    let insulation = &input.insulation;

    let window_u = overrides.window_u.unwrap_or_else(|| {
        insulation
            .windows
            .unwrap_or_else(|| GlazingLevel::nearest_to(defaults.window_u))
            .u_value()
    });
    let roof_u = overrides.roof_u.unwrap_or_else(|| {
        insulation
            .roof
            .unwrap_or_else(|| RoofInsulation::nearest_to(defaults.roof_u))
            .u_value()
    });
    let wall_u = overrides.wall_u.unwrap_or_else(|| {
        insulation
            .walls
            .unwrap_or_else(|| WallInsulation::nearest_to(defaults.wall_u))
            .u_value()
    });
    let floor_u = overrides.floor_u.unwrap_or_else(|| {
        insulation
            .floor
            .unwrap_or_else(|| FloorInsulation::nearest_to(defaults.floor_u))
            .u_value()
    });

    Envelope {
        window: EnvelopeElement::new(window_u, overrides.window_area.unwrap_or(areas.window)),
        roof: EnvelopeElement::new(roof_u, overrides.roof_area.unwrap_or(areas.roof)),
        wall: EnvelopeElement::new(wall_u, overrides.wall_area.unwrap_or(areas.wall)),
        floor: EnvelopeElement::new(floor_u, overrides.floor_area.unwrap_or(areas.floor)),
    }
}

fn resolve_efficiency_override(
    mut system: HeatingSystemData,
    efficiency_override: Option<f64>,
) -> HeatingSystemData {
    if let Some(efficiency) = efficiency_override {
        if efficiency.is_finite() && efficiency > 0. {
            system.efficiency = match system.efficiency {
                Efficiency::Scop(_) => Efficiency::Scop(efficiency.clamp(0.05, 8.0)),
                Efficiency::Combustion(_) => Efficiency::Combustion(efficiency.clamp(0.05, 1.0)),
            };
        } else {
            warn!("unusable efficiency override {efficiency}, keeping table value");
        }
    }
    system
}

fn resolve_prices(overrides: &IndexMap<FuelKind, f64>) -> IndexMap<FuelKind, f64> {
    FuelKind::iter()
        .map(|kind| {
            let price = match overrides.get(&kind) {
                Some(price) if price.is_finite() && *price >= 0. => *price,
                Some(price) => {
                    warn!("ignoring unusable {kind} price {price}");
                    kind.tariff().default_price_per_unit
                }
                None => kind.tariff().default_price_per_unit,
            };
            (kind, price)
        })
        .collect()
}

fn clamp_with_log(value: f64, min: f64, max: f64, field: &str) -> f64 {
    if !value.is_finite() {
        warn!("unusable {field} value, substituting minimum {min}");
        return min;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        debug!("{field} {value} clamped to {clamped}");
    }
    clamped
}
