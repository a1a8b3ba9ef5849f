use crate::core::reference::climate::ClimateZone;
use crate::core::units::{HOURS_PER_DAY, VOLUMETRIC_HEAT_CAPACITY_OF_AIR, WATTS_PER_KILOWATT};
use serde::Serialize;

/// Annual heat demand from a steady-state loss coefficient and heating
/// degree-days. Transmission and ventilation losses are combined into a
/// single W/K coefficient, scaled by the zone's degree-days, then derated
/// by behavior factors.

/// One envelope element: a U-value (W/m²·K) and an area (m²). A zero
/// U-value or area makes the element contribute nothing - that stands for
/// a perfectly insulated or absent element and is not an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EnvelopeElement {
    pub u_value: f64,
    pub area: f64,
}

impl EnvelopeElement {
    pub fn new(u_value: f64, area: f64) -> Self {
        Self { u_value, area }
    }

    /// Transmission loss contribution in W/K. Non-finite or negative
    /// values contribute zero rather than poisoning the total.
    pub fn heat_loss_coefficient(&self) -> f64 {
        if self.u_value.is_finite() && self.u_value > 0. && self.area.is_finite() && self.area > 0.
        {
            self.u_value * self.area
        } else {
            0.
        }
    }
}

/// The four envelope elements of a single-zone building.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Envelope {
    pub window: EnvelopeElement,
    pub roof: EnvelopeElement,
    pub wall: EnvelopeElement,
    pub floor: EnvelopeElement,
}

impl Envelope {
    /// Htr = Σ U_i × A_i, in W/K, summed without intermediate rounding.
    pub fn transmission_coefficient(&self) -> f64 {
        self.window.heat_loss_coefficient()
            + self.roof.heat_loss_coefficient()
            + self.wall.heat_loss_coefficient()
            + self.floor.heat_loss_coefficient()
    }
}

/// Hvent = 0.34 × ACH × volume, in W/K.
pub fn ventilation_coefficient(air_change_rate: f64, volume: f64) -> f64 {
    let air_change_rate = sanitize_non_negative(air_change_rate);
    let volume = sanitize_non_negative(volume);
    VOLUMETRIC_HEAT_CAPACITY_OF_AIR * air_change_rate * volume
}

/// Intermediate and final figures of the heat demand estimation, kept for
/// the transparency report.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeatDemand {
    /// Htr, in W/K.
    pub transmission_coefficient: f64,
    /// Hvent, in W/K.
    pub ventilation_coefficient: f64,
    /// Htot = Htr + Hvent, in W/K.
    pub total_coefficient: f64,
    /// Degree-days of the resolved zone, in °C·day.
    pub heating_degree_days: u32,
    /// Demand before behavior derating, in kWh/year.
    pub raw_demand_kwh: f64,
    /// Demand after schedule and occupancy derating, in kWh/year.
    pub demand_kwh: f64,
}

/// Estimate the annual heat demand of a building.
///
/// Degree-days are in °C·day, so ×24 converts them to hour-degrees and
/// ÷1000 converts Wh to kWh. The schedule and occupancy factors are
/// clamped to (0, 1]: they can only reduce the physics-based demand.
pub fn annual_heat_demand(
    envelope: &Envelope,
    air_change_rate: f64,
    volume: f64,
    zone: &ClimateZone,
    schedule_factor: f64,
    occupancy_factor: f64,
) -> HeatDemand {
    let transmission_coefficient = envelope.transmission_coefficient();
    let ventilation_coefficient = ventilation_coefficient(air_change_rate, volume);
    let total_coefficient = transmission_coefficient + ventilation_coefficient;
    let raw_demand_kwh = total_coefficient * zone.heating_degree_days as f64
        * HOURS_PER_DAY as f64
        / WATTS_PER_KILOWATT as f64;
    let demand_kwh =
        raw_demand_kwh * derating_factor(schedule_factor) * derating_factor(occupancy_factor);
    HeatDemand {
        transmission_coefficient,
        ventilation_coefficient,
        total_coefficient,
        heating_degree_days: zone.heating_degree_days,
        raw_demand_kwh,
        demand_kwh,
    }
}

fn derating_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor > 0. {
        factor.min(1.)
    } else {
        1.
    }
}

fn sanitize_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0. {
        value
    } else {
        0.
    }
}
