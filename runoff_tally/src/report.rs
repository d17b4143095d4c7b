// ********* Reporting *********
//
// The tabulation loop pushes its human-readable events into a sink instead of
// printing them itself. The round statistics returned by the loop carry the
// same information in structured form.

/// A dump of the state of the election just before a round is tallied.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundSlate {
    pub round: u32,
    /// The live candidates, in slate order.
    pub candidates: Vec<String>,
    /// One column per rank. `columns[0]` is the active preference of every
    /// ballot; the following columns are the original rank entries. Exhausted
    /// or blank positions show as `-`, undeclared names as `?`.
    pub columns: Vec<Vec<String>>,
}

/// Receives the election reports as they are produced, one call per event.
pub trait ReportSink {
    /// Called before each round's tally with the current slate. The default
    /// implementation ignores it.
    fn slate(&mut self, _slate: &RoundSlate) {}

    /// A candidate reached a majority (or won by lot on a dead-even slate).
    fn winner(&mut self, name: &str, votes: u64, total: u64);

    /// A candidate held the fewest votes and leaves the slate.
    fn eliminated(&mut self, name: &str, votes: u64, total: u64);
}

fn percent(votes: u64, total: u64) -> f64 {
    (votes as f64) / (total as f64) * 100.0
}

/// The exact winner report line.
pub fn winner_line(name: &str, votes: u64, total: u64) -> String {
    format!(
        "Candidate {} wins with {:.2}% of the vote.",
        name,
        percent(votes, total)
    )
}

/// The exact elimination report line.
pub fn elimination_line(name: &str, votes: u64, total: u64) -> String {
    format!(
        "Candidate {} was eliminated with {:.2}% of the vote.",
        name,
        percent(votes, total)
    )
}

/// Prints the reports to standard output. Slate dumps are only printed in
/// verbose mode.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReport {
    pub verbose: bool,
}

impl ReportSink for ConsoleReport {
    fn slate(&mut self, slate: &RoundSlate) {
        if !self.verbose {
            return;
        }
        println!("----- ROUND {} -----", slate.round);
        println!("Candidates: {}", slate.candidates.join(", "));
        for (rank, column) in slate.columns.iter().enumerate() {
            if rank == 0 {
                println!("Active votes: {}", column.join(", "));
            } else {
                println!("Rank {} votes: {}", rank + 1, column.join(", "));
            }
        }
    }

    fn winner(&mut self, name: &str, votes: u64, total: u64) {
        println!("{}", winner_line(name, votes, total));
    }

    fn eliminated(&mut self, name: &str, votes: u64, total: u64) {
        println!("{}", elimination_line(name, votes, total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_line_format() {
        assert_eq!(
            winner_line("Jason", 10, 200),
            "Candidate Jason wins with 5.00% of the vote."
        );
        assert_eq!(
            winner_line("B", 4, 5),
            "Candidate B wins with 80.00% of the vote."
        );
    }

    #[test]
    fn elimination_line_format() {
        assert_eq!(
            elimination_line("Alex", 5, 30),
            "Candidate Alex was eliminated with 16.67% of the vote."
        );
        assert_eq!(
            elimination_line("C", 1, 5),
            "Candidate C was eliminated with 20.00% of the vote."
        );
    }
}
