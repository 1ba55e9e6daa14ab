mod backend;
mod model;
mod solver;
mod time_limit;

#[doc(inline)]
pub use backend::MicroLpSolver;
#[doc(inline)]
pub use model::{LinearConstraint, LinearProgram, Sense, VarKey, Variable};
#[doc(inline)]
pub use solver::{LpSolution, LpSolver, SolveStatus};
#[doc(inline)]
pub use time_limit::TimeLimitedSolver;
