use crate::core::reference::heating::{
    Efficiency, FuelKind, HeatingSystemData, DEFAULT_COMBUSTION_EFFICIENCY, DEFAULT_SCOP,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Annual cost aggregation: heat demand split across appliances and
/// converted to purchased fuel, plus baseline/pool/EV electricity, minus
/// the photovoltaic self-consumption credit.

/// Heuristic annual load of a heated pool, in kWh per m³ of basin volume.
pub const POOL_HEATING_KWH_PER_M3: f64 = 20.;

/// Fraction of PV generation assumed consumable on site. Generation beyond
/// the on-site electrical load earns no credit (no feed-in tariff).
pub const PV_SELF_USE_RATIO: f64 = 0.65;

/// Multiplicative band half-widths on the total: wider while usage inputs
/// are unconfirmed, narrower once confirmed.
pub const UNCERTAINTY_MARGIN_UNCONFIRMED: f64 = 0.20;
pub const UNCERTAINTY_MARGIN_CONFIRMED: f64 = 0.12;

/// Purchased energy and cost of a single heating appliance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SystemCost {
    pub label: &'static str,
    pub fuel: FuelKind,
    /// Useful heat this appliance delivers, in kWh.
    pub delivered_heat_kwh: f64,
    /// Energy bought to deliver it, in kWh.
    pub purchased_kwh: f64,
    /// Purchased energy expressed in the fuel's billing unit.
    pub fuel_units: f64,
    pub unit: &'static str,
    pub cost: f64,
}

/// Convert delivered heat into purchased energy and cost for one
/// appliance. An unusable efficiency falls back to SCOP 1.0 for electric
/// systems and η 0.90 for combustion ones.
pub fn system_cost(
    system: &HeatingSystemData,
    delivered_heat_kwh: f64,
    prices: &IndexMap<FuelKind, f64>,
) -> SystemCost {
    let divisor = match system.efficiency {
        Efficiency::Scop(cop) if cop.is_finite() && cop > 0. => cop,
        Efficiency::Scop(_) => DEFAULT_SCOP,
        Efficiency::Combustion(eta) if eta.is_finite() && eta > 0. => eta,
        Efficiency::Combustion(_) => DEFAULT_COMBUSTION_EFFICIENCY,
    };
    let tariff = system.fuel.tariff();
    let purchased_kwh = delivered_heat_kwh / divisor;
    let fuel_units = purchased_kwh / tariff.kwh_per_unit;
    let price = price_for(system.fuel, prices);
    SystemCost {
        label: system.label,
        fuel: system.fuel,
        delivered_heat_kwh,
        purchased_kwh,
        fuel_units,
        unit: tariff.unit,
        cost: fuel_units * price,
    }
}

fn price_for(fuel: FuelKind, prices: &IndexMap<FuelKind, f64>) -> f64 {
    prices
        .get(&fuel)
        .copied()
        .filter(|price| price.is_finite() && *price >= 0.)
        .unwrap_or(fuel.tariff().default_price_per_unit)
}

/// Annual electricity drawn by an EV: yearly distance times consumption,
/// inflated by charging losses.
pub fn ev_annual_kwh(km_per_year: f64, kwh_per_100km: f64, charging_loss: f64) -> f64 {
    km_per_year.max(0.) * kwh_per_100km.max(0.) / 100. * (1. + charging_loss.clamp(0., 0.5))
}

pub fn pool_annual_kwh(basin_volume_m3: f64) -> f64 {
    basin_volume_m3.max(0.) * POOL_HEATING_KWH_PER_M3
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PvContribution {
    pub generation_kwh: f64,
    pub self_consumed_kwh: f64,
    pub credit: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub primary: SystemCost,
    pub secondary: Option<SystemCost>,
    pub baseline_kwh: f64,
    pub baseline_cost: f64,
    pub pool_kwh: f64,
    pub pool_cost: f64,
    pub ev_kwh: f64,
    pub ev_cost: f64,
    pub pv: Option<PvContribution>,
    pub uncertainty_margin: f64,
    pub total_cost: f64,
    pub total_cost_low: f64,
    pub total_cost_high: f64,
    /// Numerator of the DPE intensity: final heat demand plus all
    /// electrical loads, in kWh.
    pub total_relevant_kwh: f64,
}

pub struct CostParameters<'a> {
    pub heat_demand_kwh: f64,
    pub primary: HeatingSystemData,
    /// Secondary appliance with its share of the heat demand, in [0, 0.5].
    pub secondary: Option<(HeatingSystemData, f64)>,
    pub baseline_kwh: f64,
    pub pool_kwh: f64,
    pub ev_kwh: f64,
    /// Annual PV generation already derated for orientation, in kWh.
    pub pv_generation_kwh: Option<f64>,
    pub prices: &'a IndexMap<FuelKind, f64>,
    pub usage_confirmed: bool,
}

/// Aggregate all annual costs. The self-consumption credit is capped by
/// the total *electrical* load (electric heating purchases plus baseline,
/// pool and EV); the grand total never goes below zero.
pub fn aggregate_costs(params: CostParameters) -> CostBreakdown {
    let share = params
        .secondary
        .as_ref()
        .map(|(_, share)| share.clamp(0., 0.5))
        .unwrap_or(0.);
    let primary = system_cost(
        &params.primary,
        params.heat_demand_kwh * (1. - share),
        params.prices,
    );
    let secondary = params
        .secondary
        .as_ref()
        .map(|(system, _)| system_cost(system, params.heat_demand_kwh * share, params.prices));

    let electricity_price = price_for(FuelKind::Electricity, params.prices);
    let baseline_kwh = params.baseline_kwh.max(0.);
    let baseline_cost = baseline_kwh * electricity_price;
    let pool_kwh = params.pool_kwh.max(0.);
    let pool_cost = pool_kwh * electricity_price;
    let ev_kwh = params.ev_kwh.max(0.);
    let ev_cost = ev_kwh * electricity_price;

    let heating_electricity_kwh = [Some(&primary), secondary.as_ref()]
        .into_iter()
        .flatten()
        .filter(|system| system.fuel == FuelKind::Electricity)
        .map(|system| system.purchased_kwh)
        .sum::<f64>();
    let electrical_load_kwh = heating_electricity_kwh + baseline_kwh + pool_kwh + ev_kwh;

    let pv = params.pv_generation_kwh.map(|generation_kwh| {
        let generation_kwh = generation_kwh.max(0.);
        let self_consumed_kwh = (generation_kwh * PV_SELF_USE_RATIO).min(electrical_load_kwh);
        PvContribution {
            generation_kwh,
            self_consumed_kwh,
            credit: self_consumed_kwh * electricity_price,
        }
    });
    let pv_credit = pv.map(|pv| pv.credit).unwrap_or(0.);

    let total_cost = (primary.cost
        + secondary.map(|system| system.cost).unwrap_or(0.)
        + baseline_cost
        + pool_cost
        + ev_cost
        - pv_credit)
        .max(0.);

    let uncertainty_margin = if params.usage_confirmed {
        UNCERTAINTY_MARGIN_CONFIRMED
    } else {
        UNCERTAINTY_MARGIN_UNCONFIRMED
    };

    CostBreakdown {
        primary,
        secondary,
        baseline_kwh,
        baseline_cost,
        pool_kwh,
        pool_cost,
        ev_kwh,
        ev_cost,
        pv,
        uncertainty_margin,
        total_cost,
        total_cost_low: total_cost * (1. - uncertainty_margin),
        total_cost_high: total_cost * (1. + uncertainty_margin),
        total_relevant_kwh: params.heat_demand_kwh.max(0.) + baseline_kwh + pool_kwh + ev_kwh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::heating::{PrimaryHeating, SecondaryHeating};
    use approx::assert_relative_eq;
    use rstest::*;

    fn default_prices() -> IndexMap<FuelKind, f64> {
        use strum::IntoEnumIterator;
        FuelKind::iter()
            .map(|kind| (kind, kind.tariff().default_price_per_unit))
            .collect()
    }

    #[fixture]
    fn prices() -> IndexMap<FuelKind, f64> {
        default_prices()
    }

    #[rstest]
    fn heat_pump_cost_for_reference_demand(prices: IndexMap<FuelKind, f64>) {
        let system = PrimaryHeating::AirSourceHeatPump.data();
        let cost = system_cost(&system, 10_000., &prices);
        assert_relative_eq!(cost.purchased_kwh, 3_125.);
        assert_relative_eq!(cost.cost, 781.25);
    }

    #[rstest]
    fn gas_boiler_cost_converts_through_fuel_units(prices: IndexMap<FuelKind, f64>) {
        let system = PrimaryHeating::GasBoiler.data();
        let cost = system_cost(&system, 10_000., &prices);
        assert_relative_eq!(cost.purchased_kwh, 10_000. / 0.92, max_relative = 1e-12);
        assert_relative_eq!(cost.fuel_units, 1_086.956_521_739_130_4, max_relative = 1e-9);
        assert_relative_eq!(cost.cost, cost.fuel_units * 1.20, max_relative = 1e-12);
    }

    #[rstest]
    fn missing_fuel_price_falls_back_to_the_default_tariff() {
        let prices = IndexMap::new();
        let system = PrimaryHeating::OilBoiler.data();
        let cost = system_cost(&system, 8_500., &prices);
        assert_relative_eq!(cost.cost, 8_500. / 0.85 / 10. * 1.10, max_relative = 1e-12);
    }

    #[rstest]
    fn secondary_system_takes_its_share_of_the_demand(prices: IndexMap<FuelKind, f64>) {
        let breakdown = aggregate_costs(CostParameters {
            heat_demand_kwh: 10_000.,
            primary: PrimaryHeating::GasBoiler.data(),
            secondary: SecondaryHeating::WoodStove
                .data()
                .map(|system| (system, SecondaryHeating::WoodStove.default_share())),
            baseline_kwh: 0.,
            pool_kwh: 0.,
            ev_kwh: 0.,
            pv_generation_kwh: None,
            prices: &prices,
            usage_confirmed: false,
        });
        assert_relative_eq!(breakdown.primary.delivered_heat_kwh, 8_500.);
        let secondary = breakdown.secondary.unwrap();
        assert_relative_eq!(secondary.delivered_heat_kwh, 1_500.);
        // 1500 kWh at η 0.70 over 1800 kWh/stère at €85
        assert_relative_eq!(secondary.cost, 1_500. / 0.70 / 1_800. * 85., max_relative = 1e-12);
    }

    #[rstest]
    fn ev_load_follows_distance_consumption_and_charging_loss() {
        assert_relative_eq!(ev_annual_kwh(15_000., 17., 0.10), 2_805., max_relative = 1e-12);
        assert_eq!(ev_annual_kwh(-100., 17., 0.10), 0.);
        // charging loss is capped at 50%
        assert_relative_eq!(ev_annual_kwh(10_000., 20., 2.), 3_000.);
    }

    #[rstest]
    fn pool_load_uses_the_flat_per_cubic_metre_heuristic() {
        assert_relative_eq!(pool_annual_kwh(50.), 1_000.);
    }

    #[rstest]
    fn pv_credit_is_capped_by_the_electrical_load(prices: IndexMap<FuelKind, f64>) {
        // Gas heating: the only electrical load is the 2000 kWh baseline.
        let breakdown = aggregate_costs(CostParameters {
            heat_demand_kwh: 10_000.,
            primary: PrimaryHeating::GasBoiler.data(),
            secondary: None,
            baseline_kwh: 2_000.,
            pool_kwh: 0.,
            ev_kwh: 0.,
            pv_generation_kwh: Some(9_000.),
            prices: &prices,
            usage_confirmed: false,
        });
        let pv = breakdown.pv.unwrap();
        assert_relative_eq!(pv.self_consumed_kwh, 2_000.);
        assert!(pv.self_consumed_kwh <= pv.generation_kwh * PV_SELF_USE_RATIO);
        assert_relative_eq!(pv.credit, 2_000. * 0.25);
    }

    #[rstest]
    fn electric_heating_widens_the_self_consumption_cap(prices: IndexMap<FuelKind, f64>) {
        let breakdown = aggregate_costs(CostParameters {
            heat_demand_kwh: 10_000.,
            primary: PrimaryHeating::AirSourceHeatPump.data(),
            secondary: None,
            baseline_kwh: 2_000.,
            pool_kwh: 0.,
            ev_kwh: 0.,
            pv_generation_kwh: Some(6_000.),
            prices: &prices,
            usage_confirmed: false,
        });
        let pv = breakdown.pv.unwrap();
        // load = 3125 (heat pump) + 2000; 6000 × 0.65 = 3900 fits under it
        assert_relative_eq!(pv.self_consumed_kwh, 3_900.);
    }

    #[rstest]
    fn total_cost_never_goes_negative(prices: IndexMap<FuelKind, f64>) {
        let breakdown = aggregate_costs(CostParameters {
            heat_demand_kwh: 0.,
            primary: PrimaryHeating::DirectElectric.data(),
            secondary: None,
            baseline_kwh: 100.,
            pool_kwh: 0.,
            ev_kwh: 0.,
            pv_generation_kwh: Some(100_000.),
            prices: &prices,
            usage_confirmed: true,
        });
        assert!(breakdown.total_cost >= 0.);
        assert!(breakdown.total_cost_low >= 0.);
    }

    #[rstest]
    #[case(false, UNCERTAINTY_MARGIN_UNCONFIRMED)]
    #[case(true, UNCERTAINTY_MARGIN_CONFIRMED)]
    fn uncertainty_band_narrows_once_usage_is_confirmed(
        #[case] usage_confirmed: bool,
        #[case] expected_margin: f64,
        prices: IndexMap<FuelKind, f64>,
    ) {
        let breakdown = aggregate_costs(CostParameters {
            heat_demand_kwh: 10_000.,
            primary: PrimaryHeating::GasBoiler.data(),
            secondary: None,
            baseline_kwh: 3_500.,
            pool_kwh: 0.,
            ev_kwh: 0.,
            pv_generation_kwh: None,
            prices: &prices,
            usage_confirmed,
        });
        assert_relative_eq!(breakdown.uncertainty_margin, expected_margin);
        assert_relative_eq!(
            breakdown.total_cost_low,
            breakdown.total_cost * (1. - expected_margin),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            breakdown.total_cost_high,
            breakdown.total_cost * (1. + expected_margin),
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn dpe_numerator_counts_demand_and_electrical_loads(prices: IndexMap<FuelKind, f64>) {
        let breakdown = aggregate_costs(CostParameters {
            heat_demand_kwh: 12_000.,
            primary: PrimaryHeating::GasBoiler.data(),
            secondary: None,
            baseline_kwh: 3_500.,
            pool_kwh: 1_000.,
            ev_kwh: 2_805.,
            pv_generation_kwh: None,
            prices: &prices,
            usage_confirmed: false,
        });
        assert_relative_eq!(breakdown.total_relevant_kwh, 19_305.);
    }
}
