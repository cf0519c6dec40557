//! Location, weather and AI flows for locfinder
//!
//! Each flow owns one observable resource and drives it through
//! Idle/Loading/Ready/Failed. [`Session`] wires them to live or mock
//! collaborators from configuration.

pub mod ai;
pub mod location;
pub mod session;
pub mod weather;

pub use ai::AiFlow;
pub use location::{LocationFlow, ResolvedLocation};
pub use session::Session;
pub use weather::WeatherFlow;
