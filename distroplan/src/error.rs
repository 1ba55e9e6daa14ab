use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::lp::SolveStatus;

/// The pipeline stage an error originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Forecast,
    Allocation,
    Scenario,
    Routing,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Forecast => "forecast",
            Stage::Allocation => "allocation",
            Stage::Scenario => "scenario allocation",
            Stage::Routing => "routing",
        };
        f.write_str(s)
    }
}

/// Identifying keys of the record an error refers to.
/// Only the keys relevant to the failing record are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordKey {
    pub warehouse: Option<String>,
    pub city: Option<String>,
    pub vehicle: Option<String>,
    pub day: Option<u32>,
}

impl RecordKey {
    pub fn warehouse(id: &str) -> Self {
        Self {
            warehouse: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn city(id: &str) -> Self {
        Self {
            city: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn vehicle(id: &str) -> Self {
        Self {
            vehicle: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_city(mut self, id: &str) -> Self {
        self.city = Some(id.to_string());
        self
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut parts = vec![];
        if let Some(w) = &self.warehouse {
            parts.push(format!("warehouse={w}"));
        }
        if let Some(v) = &self.vehicle {
            parts.push(format!("vehicle={v}"));
        }
        if let Some(c) = &self.city {
            parts.push(format!("city={c}"));
        }
        if let Some(d) = self.day {
            parts.push(format!("day={d}"));
        }
        write!(f, "[{}]", parts.join(" "))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A table row is missing, duplicated or out of range.
    #[error("invalid {table} record {key}: {reason}")]
    InputValidation {
        table: &'static str,
        key: RecordKey,
        reason: String,
    },
    /// The forecaster cannot estimate residual spread for an entity.
    #[error("insufficient history for {key}: {residuals} residual(s), at least 2 required")]
    InsufficientHistory { key: RecordKey, residuals: usize },
    /// The LP of a stage did not reach optimality; the stage produced no plan.
    #[error("{stage} LP ended with status {status}: {detail}")]
    SolverStatus {
        stage: Stage,
        status: SolveStatus,
        detail: String,
    },
    #[error("configuration error for {key}: {reason}")]
    Configuration { key: RecordKey, reason: String },
    /// A solved plan does not satisfy its own constraints within tolerance.
    #[error("inconsistent {stage} result for {key}: expected {expected}, got {actual}")]
    Consistency {
        stage: Stage,
        key: RecordKey,
        expected: f64,
        actual: f64,
    },
}

impl PlanError {
    pub(crate) fn invalid(table: &'static str, key: RecordKey, reason: impl Into<String>) -> Self {
        PlanError::InputValidation {
            table,
            key,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(key: RecordKey, reason: impl Into<String>) -> Self {
        PlanError::Configuration {
            key,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_lists_only_present_keys() {
        let key = RecordKey::warehouse("W1").with_city("Pune").with_day(3);
        assert_eq!(key.to_string(), "[warehouse=W1 city=Pune day=3]");
        assert_eq!(RecordKey::default().to_string(), "[]");
    }

    #[test]
    fn solver_status_message_names_stage() {
        let err = PlanError::SolverStatus {
            stage: Stage::Routing,
            status: SolveStatus::Infeasible,
            detail: "fleet too small".into(),
        };
        assert_eq!(
            err.to_string(),
            "routing LP ended with status infeasible: fleet too small"
        );
    }
}
