use slotmap::{SecondaryMap, SlotMap, new_key_type};

new_key_type! {
    /// Unique key for each [`Variable`] in a [`LinearProgram`]
    pub struct VarKey;
}

/// A continuous decision variable with bounds
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    /// `f64::INFINITY` for an unbounded variable
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Leq,
    Geq,
    Eq,
}

/// `Σ coefficient·variable (sense) rhs`
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(VarKey, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Backend-independent minimisation LP.
/// Built once per planner run and handed to an [`LpSolver`](crate::lp::LpSolver).
#[derive(Debug, Clone, Default)]
pub struct LinearProgram {
    pub name: String,
    variables: SlotMap<VarKey, Variable>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(VarKey, f64)>,
}

impl LinearProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_variable(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarKey {
        debug_assert!(lower <= upper, "variable bounds inverted");
        self.variables.insert(Variable {
            name: name.into(),
            lower,
            upper,
        })
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: impl IntoIterator<Item = (VarKey, f64)>,
        sense: Sense,
        rhs: f64,
    ) {
        let terms: Vec<_> = terms.into_iter().collect();
        debug_assert!(terms.iter().all(|(k, _)| self.variables.contains_key(*k)));
        self.constraints.push(LinearConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
    }

    /// Replaces the objective (to be minimised)
    pub fn set_objective(&mut self, terms: impl IntoIterator<Item = (VarKey, f64)>) {
        self.objective = terms.into_iter().collect();
        debug_assert!(self.objective.iter().all(|(k, _)| self.variables.contains_key(*k)));
    }

    pub fn variables(&self) -> impl Iterator<Item = (VarKey, &Variable)> {
        self.variables.iter()
    }

    pub fn variable(&self, key: VarKey) -> &Variable {
        &self.variables[key]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(VarKey, f64)] {
        &self.objective
    }

    pub fn n_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective_value(&self, values: &SecondaryMap<VarKey, f64>) -> f64 {
        self.objective
            .iter()
            .map(|(k, coef)| coef * values.get(*k).copied().unwrap_or(0.0))
            .sum()
    }

    /// Left-hand side of a constraint evaluated at the given values
    pub fn activity(&self, constraint: &LinearConstraint, values: &SecondaryMap<VarKey, f64>) -> f64 {
        constraint
            .terms
            .iter()
            .map(|(k, coef)| coef * values.get(*k).copied().unwrap_or(0.0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_and_activity() {
        let mut lp = LinearProgram::new("test");
        let x = lp.add_variable("x", 0.0, f64::INFINITY);
        let y = lp.add_variable("y", 0.0, 10.0);
        lp.set_objective([(x, 2.0), (y, 3.0)]);
        lp.add_constraint("sum", [(x, 1.0), (y, 1.0)], Sense::Geq, 4.0);

        let mut values = SecondaryMap::new();
        values.insert(x, 1.0);
        values.insert(y, 3.0);

        assert_eq!(lp.n_variables(), 2);
        assert_eq!(lp.n_constraints(), 1);
        assert_eq!(lp.objective_value(&values), 11.0);
        assert_eq!(lp.activity(&lp.constraints()[0], &values), 4.0);
        assert_eq!(lp.variable(y).upper, 10.0);
    }
}
