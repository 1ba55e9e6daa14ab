use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::warn;

use crate::lp::{LinearProgram, LpSolution, LpSolver, SolveStatus};

/// Runs the wrapped solver on a worker thread and waits at most `time_limit` for it.
///
/// When the limit passes, [`SolveStatus::TimedOut`] is returned and the worker is left to finish on its own;
/// its result is discarded.
#[derive(Debug)]
pub struct TimeLimitedSolver<S> {
    inner: Arc<S>,
    time_limit: Duration,
}

impl<S> TimeLimitedSolver<S> {
    pub fn new(inner: S, time_limit: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            time_limit,
        }
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<S: LpSolver + 'static> LpSolver for TimeLimitedSolver<S> {
    fn solve(&self, lp: &LinearProgram) -> LpSolution {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let model = lp.clone();

        let spawned = thread::Builder::new()
            .name(format!("lp-{}", lp.name))
            .spawn(move || {
                //receiver may be gone after a timeout
                let _ = tx.send(inner.solve(&model));
            });
        if let Err(err) = spawned {
            warn!("[LP] could not spawn solver thread for {}: {err}", lp.name);
            return LpSolution::without_values(SolveStatus::NotSolved);
        }

        match rx.recv_timeout(self.time_limit) {
            Ok(solution) => solution,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "[LP] {} exceeded the time limit of {:?}",
                    lp.name, self.time_limit
                );
                LpSolution::without_values(SolveStatus::TimedOut)
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("[LP] solver thread for {} terminated without a result", lp.name);
                LpSolution::without_values(SolveStatus::NotSolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{MicroLpSolver, Sense};

    /// Never answers within any reasonable limit
    struct StalledSolver;

    impl LpSolver for StalledSolver {
        fn solve(&self, _lp: &LinearProgram) -> LpSolution {
            thread::sleep(Duration::from_secs(5));
            LpSolution::without_values(SolveStatus::NotSolved)
        }
    }

    struct PanickingSolver;

    impl LpSolver for PanickingSolver {
        fn solve(&self, _lp: &LinearProgram) -> LpSolution {
            panic!("backend crashed")
        }
    }

    fn tiny_lp() -> LinearProgram {
        let mut lp = LinearProgram::new("tiny");
        let x = lp.add_variable("x", 0.0, f64::INFINITY);
        lp.set_objective([(x, 1.0)]);
        lp.add_constraint("floor", [(x, 1.0)], Sense::Geq, 2.0);
        lp
    }

    #[test]
    fn timeout_is_distinct_from_infeasibility() {
        let solver = TimeLimitedSolver::new(StalledSolver, Duration::from_millis(20));
        let sol = solver.solve(&tiny_lp());
        assert_eq!(sol.status, SolveStatus::TimedOut);
        assert_ne!(sol.status, SolveStatus::Infeasible);
    }

    #[test]
    fn passes_through_results_within_limit() {
        let solver = TimeLimitedSolver::new(MicroLpSolver, Duration::from_secs(30));
        let sol = solver.solve(&tiny_lp());
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert!((sol.objective_value.unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn crashed_backend_is_not_solved() {
        let solver = TimeLimitedSolver::new(PanickingSolver, Duration::from_secs(5));
        assert_eq!(solver.solve(&tiny_lp()).status, SolveStatus::NotSolved);
    }
}
