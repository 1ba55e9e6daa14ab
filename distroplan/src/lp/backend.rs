use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, constraint, microlp,
    variable,
};
use log::{debug, warn};
use slotmap::SecondaryMap;

use crate::lp::{LinearProgram, LpSolution, LpSolver, Sense, SolveStatus, VarKey};

/// Values within this distance of zero are reported as exactly zero
const ZERO_SNAP: f64 = 1e-9;

/// Solves [`LinearProgram`]s with the pure-Rust `microlp` simplex solver through `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl LpSolver for MicroLpSolver {
    fn solve(&self, lp: &LinearProgram) -> LpSolution {
        let mut vars = ProblemVariables::new();
        let mut handles = SecondaryMap::with_capacity(lp.n_variables());
        for (key, var) in lp.variables() {
            let mut def = variable().name(var.name.clone());
            if var.lower.is_finite() {
                def = def.min(var.lower);
            }
            if var.upper.is_finite() {
                def = def.max(var.upper);
            }
            handles.insert(key, vars.add(def));
        }

        let objective = expression(lp.objective().iter().copied(), &handles);
        let mut problem = vars.minimise(objective).using(microlp);

        for c in lp.constraints() {
            let terms = c.terms.iter().copied();
            let con = match c.sense {
                Sense::Leq => constraint::leq(expression(terms, &handles), c.rhs),
                // a >= b is expressed as -a <= -b
                Sense::Geq => constraint::leq(
                    expression(terms.map(|(k, coef)| (k, -coef)), &handles),
                    -c.rhs,
                ),
                Sense::Eq => constraint::eq(expression(terms, &handles), c.rhs),
            };
            problem.add_constraint(con);
        }

        debug!(
            "[LP] solving {} ({} variables, {} constraints)",
            lp.name,
            lp.n_variables(),
            lp.n_constraints()
        );

        match problem.solve() {
            Ok(solution) => {
                let values: SecondaryMap<VarKey, f64> = handles
                    .iter()
                    .map(|(key, handle)| {
                        let v = solution.value(*handle);
                        (key, if v.abs() < ZERO_SNAP { 0.0 } else { v })
                    })
                    .collect();
                let objective_value = lp.objective_value(&values);
                LpSolution::optimal(values, objective_value)
            }
            Err(ResolutionError::Infeasible) => LpSolution::without_values(SolveStatus::Infeasible),
            Err(ResolutionError::Unbounded) => LpSolution::without_values(SolveStatus::Unbounded),
            Err(err) => {
                warn!("[LP] backend failed on {}: {err}", lp.name);
                LpSolution::without_values(SolveStatus::NotSolved)
            }
        }
    }
}

fn expression(
    terms: impl Iterator<Item = (VarKey, f64)>,
    handles: &SecondaryMap<VarKey, good_lp::Variable>,
) -> Expression {
    let mut expr = Expression::from(0.0);
    for (key, coef) in terms {
        expr.add_mul(coef, handles[key]);
    }
    expr
}
