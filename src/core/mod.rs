pub mod cost;
pub mod dpe;
pub mod heat_demand;
pub mod reference;
pub mod units;
