//! Fleet readiness dashboard for a metro depot.
//!
//! The core is pure: [`services::summary`] counts trains per status,
//! [`services::cleaning`] and [`services::maintenance`] classify each train's
//! open tasks, and [`services::simulation`] projects the fleet under a fixed
//! set of what-if scenarios. [`handlers`] exposes those views over HTTP.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod telemetry;

pub use error::{FleetError, FleetResult};
