//!
//! Multi-day distribution planning for goods moving from warehouses to demand points.
//!
//! The pipeline has three stages, each a single batch computation over a fixed horizon:
//! * [`forecast::DemandForecaster`] turns demand history into p10/p50/p90 bands
//! * [`planning::AllocationPlanner`] assigns warehouse inventory to cities per day
//! * [`planning::RoutePlanner`] splits the allocation across each warehouse's fleet
//!
//! [`planning::ScenarioAllocationPlanner`] reruns the allocation under demand and inventory multipliers.
//!

/// Records and validated tables flowing between the stages
pub mod entities;

/// Typed errors raised by every stage
pub mod error;

/// Moving-average demand forecasting with uncertainty bands
pub mod forecast;

/// Importing external row representations into the library and exporting plans out of it
pub mod io;

/// Linear programming model and the solver backends
pub mod lp;

/// The allocation, scenario and routing planners
pub mod planning;

/// Helper functions which do not belong to any specific module
pub mod util;

#[doc(inline)]
pub use error::PlanError;
