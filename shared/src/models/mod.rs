//! Domain models for the Weather Dashboard

mod location;
mod preferences;
mod weather;

pub use location::*;
pub use preferences::*;
pub use weather::*;
