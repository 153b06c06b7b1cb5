// procedural city layout + per-building RF measurement synthesis
// `city` is the generation core, `systems` is the bevy viewer built on top of it

pub mod city;
pub mod config;
pub mod error;
pub mod systems;


pub use city::{generate, generate_city_rf_data, RfDataResponse};
pub use error::{Error, Result};
