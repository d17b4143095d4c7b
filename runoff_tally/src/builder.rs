pub use crate::config::*;
use crate::report::ReportSink;

/// A builder for assembling the slate and the ballots of an election.
///
/// ```
/// pub use runoff_tally::Builder;
/// # use runoff_tally::ElectionError;
///
/// let mut builder = Builder::new(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ranking(&["Anna".to_string(), "Clara".to_string(), "".to_string()])?;
///
/// # Ok::<(), ElectionError>(())
/// ```
pub struct Builder {
    pub(crate) candidates: Vec<String>,
    pub(crate) ballots: Vec<Ballot>,
}

impl Builder {
    /// Starts a builder over the given slate. The slate is validated up
    /// front: names must be unique and non-empty.
    pub fn new(candidates: &[String]) -> Result<Builder, ElectionError> {
        if candidates.is_empty() {
            return Err(ElectionError::EmptyElection);
        }
        for (idx, name) in candidates.iter().enumerate() {
            if name.is_empty() {
                return Err(ElectionError::EmptyCandidateName);
            }
            if candidates[..idx].contains(name) {
                return Err(ElectionError::DuplicateCandidate(name.clone()));
            }
        }
        Ok(Builder {
            candidates: candidates.to_vec(),
            ballots: Vec::new(),
        })
    }

    /// Builds one builder from the classic per-rank columns (first choices,
    /// second choices, ...), one entry per voter in every column. An empty
    /// string marks a rank with no vote. All columns must have the same
    /// length.
    pub fn from_columns(
        candidates: &[String],
        columns: &[&[String]],
    ) -> Result<Builder, ElectionError> {
        let mut builder = Builder::new(candidates)?;
        let expected = columns.first().map(|c| c.len()).unwrap_or(0);
        for column in columns.iter() {
            if column.len() != expected {
                return Err(ElectionError::MismatchedColumns {
                    expected,
                    actual: column.len(),
                });
            }
        }
        for voter in 0..expected {
            let ranks: Vec<&str> = columns.iter().map(|c| c[voter].as_str()).collect();
            builder.ballots.push(Ballot::ranked(&ranks));
        }
        Ok(builder)
    }

    /// Adds a ballot from plain names, most preferred first. An empty string
    /// marks a rank with no vote. Names that match no candidate are kept and
    /// will simply never receive a vote.
    pub fn add_ranking(&mut self, names: &[String]) -> Result<(), ElectionError> {
        let ranks: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        self.add_ballot(&Ballot::ranked(&ranks))
    }

    pub fn add_ballot(&mut self, ballot: &Ballot) -> Result<(), ElectionError> {
        self.ballots.push(ballot.clone());
        Ok(())
    }

    /// Tabulates the election with the default random source.
    pub fn tabulate(&self, sink: &mut dyn ReportSink) -> Result<ElectionResult, ElectionError> {
        crate::run_election(&self.candidates, &self.ballots, sink)
    }

    /// Tabulates the election with a seeded generator.
    pub fn tabulate_seeded(
        &self,
        sink: &mut dyn ReportSink,
        seed: u64,
    ) -> Result<ElectionResult, ElectionError> {
        crate::run_election_seeded(&self.candidates, &self.ballots, sink, seed)
    }
}
