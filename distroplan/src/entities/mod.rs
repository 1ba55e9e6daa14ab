mod demand;
mod fleet;
mod forecast;
mod route;
mod shipment;
mod supply;

#[doc(inline)]
pub use demand::DemandHistory;
#[doc(inline)]
pub use demand::DemandObservation;
#[doc(inline)]
pub use fleet::FleetConfig;
#[doc(inline)]
pub use fleet::FleetEntry;
#[doc(inline)]
pub use fleet::Vehicle;
#[doc(inline)]
pub use forecast::ForecastRecord;
#[doc(inline)]
pub use forecast::ForecastTable;
#[doc(inline)]
pub use route::RoutePlan;
#[doc(inline)]
pub use route::RouteRecord;
#[doc(inline)]
pub use shipment::ShipmentPlan;
#[doc(inline)]
pub use shipment::ShipmentPlanRecord;
#[doc(inline)]
pub use supply::SupplyRecord;
#[doc(inline)]
pub use supply::SupplyTable;
