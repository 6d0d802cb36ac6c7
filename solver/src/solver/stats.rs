use std::fmt::{Display, Error, Formatter};
use std::time::Duration;

/// Statistics of the solver.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Cumulated time spent in satisfiability checks.
    pub solve_time: Duration,
    /// Number of satisfiability checks performed.
    pub num_checks: u64,
    pub num_decisions: u64,
    pub num_conflicts: u64,
    pub num_solutions: u64,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        writeln!(f, "checks:         {}", self.num_checks)?;
        writeln!(f, "decisions:      {}", self.num_decisions)?;
        writeln!(f, "conflicts:      {}", self.num_conflicts)?;
        writeln!(f, "solutions:      {}", self.num_solutions)?;
        write!(f, "solve time (s): {:.6}", self.solve_time.as_secs_f64())
    }
}
