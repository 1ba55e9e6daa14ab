mod allocation;
mod routing;
mod scenario;

#[doc(inline)]
pub use allocation::AllocationPlanner;
#[doc(inline)]
pub use routing::RoutePlanner;
#[doc(inline)]
pub use scenario::Scenario;
#[doc(inline)]
pub use scenario::ScenarioAllocationPlanner;
