/// Volumetric heat capacity of air, in Wh/(m³·K). Fixed physical constant
/// used for the ventilation loss coefficient; not configurable.
pub const VOLUMETRIC_HEAT_CAPACITY_OF_AIR: f64 = 0.34;

pub const HOURS_PER_DAY: u32 = 24;
pub const WATTS_PER_KILOWATT: u32 = 1_000;

/// Assumed ceiling height when the input does not give one, in metres.
pub const DEFAULT_CEILING_HEIGHT: f64 = 2.5;

/// Habitable floor area bounds, in m². Inputs outside this range are
/// clamped, not rejected.
pub const MIN_FLOOR_AREA: f64 = 20.;
pub const MAX_FLOOR_AREA: f64 = 600.;

/// Floor-area denominator used for the DPE intensity is never taken below
/// this, in m², so tiny inputs cannot blow up the intensity.
pub const MIN_DPE_REFERENCE_AREA: f64 = 20.;
