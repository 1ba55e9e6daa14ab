/// Set of functions used throughout to assure the correctness of the library.
pub mod assertions;

mod config;
mod fpa;

#[doc(inline)]
pub use config::AllocationConfig;
#[doc(inline)]
pub use config::ForecastConfig;
#[doc(inline)]
pub use config::RoutingConfig;
#[doc(inline)]
pub use fpa::{FPA, TOLERANCE, tolerance_for};
