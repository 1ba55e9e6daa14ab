use std::fmt::{Display, Formatter};
use std::sync::Arc;

use slotmap::SecondaryMap;

use crate::lp::{LinearProgram, VarKey};

/// Outcome of a solve. Anything other than [`SolveStatus::Optimal`] carries no usable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The backend gave up or failed for another reason
    NotSolved,
    /// The caller-supplied time limit passed before the backend returned
    TimedOut,
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NotSolved => "not-solved",
            SolveStatus::TimedOut => "timed-out",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct LpSolution {
    pub status: SolveStatus,
    /// Values of all variables; empty unless optimal
    pub values: SecondaryMap<VarKey, f64>,
    pub objective_value: Option<f64>,
}

impl LpSolution {
    pub fn optimal(values: SecondaryMap<VarKey, f64>, objective_value: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective_value: Some(objective_value),
        }
    }

    pub fn without_values(status: SolveStatus) -> Self {
        debug_assert!(status != SolveStatus::Optimal);
        Self {
            status,
            values: SecondaryMap::new(),
            objective_value: None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn value(&self, key: VarKey) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

/// A linear programming backend.
/// Planners only talk to this trait, any backend can be plugged in.
pub trait LpSolver: Send + Sync {
    fn solve(&self, lp: &LinearProgram) -> LpSolution;
}

impl<S: LpSolver + ?Sized> LpSolver for &S {
    fn solve(&self, lp: &LinearProgram) -> LpSolution {
        (**self).solve(lp)
    }
}

impl<S: LpSolver + ?Sized> LpSolver for Arc<S> {
    fn solve(&self, lp: &LinearProgram) -> LpSolution {
        (**self).solve(lp)
    }
}

impl<S: LpSolver + ?Sized> LpSolver for Box<S> {
    fn solve(&self, lp: &LinearProgram) -> LpSolution {
        (**self).solve(lp)
    }
}
