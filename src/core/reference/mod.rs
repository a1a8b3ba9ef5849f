pub mod archetype;
pub mod behavior;
pub mod climate;
pub mod heating;
pub mod insulation;
