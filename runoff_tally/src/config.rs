// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// All the possible states corresponding to one ranked position in a ballot.
///
/// A name that does not match any declared candidate is accepted: it simply
/// never receives a vote.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum BallotChoice {
    /// A candidate, which may or may not be declared in the slate.
    Candidate(String),
    /// The sentinel for a rank with no usable preference. A ballot whose
    /// active preference reaches this marker is excluded from all further
    /// tallies.
    NoVote,
}

/// One voter's ranked preferences, most preferred first.
///
/// Any number of ranks is accepted, including zero.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    pub rankings: Vec<BallotChoice>,
}

impl Ballot {
    /// Builds a ballot from plain names. An empty string marks a rank with
    /// no vote.
    pub fn ranked(names: &[&str]) -> Ballot {
        Ballot {
            rankings: names
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        BallotChoice::NoVote
                    } else {
                        BallotChoice::Candidate(s.to_string())
                    }
                })
                .collect(),
        }
    }
}

// ******** Output data structures *********

/// Statistics for one round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    /// Candidate name and vote count, in slate order for this round.
    pub tally: Vec<(String, u64)>,
    /// Number of ballots counted for a live candidate this round.
    pub total_votes: u64,
    /// The winner declared this round, if any.
    pub elected: Option<String>,
    /// The candidate eliminated this round, if any.
    pub eliminated: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    /// `None` when every ballot ran out of live preferences before any
    /// candidate reached a majority.
    pub winner: Option<String>,
    pub round_stats: Vec<RoundStats>,
}

/// Errors raised by input validation, before any tallying starts.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ElectionError {
    /// The slate has no candidates.
    EmptyElection,
    /// A candidate name is the empty string, which would collide with the
    /// no-vote marker in column inputs.
    EmptyCandidateName,
    /// The same name is declared more than once in the slate.
    DuplicateCandidate(String),
    /// The election has no ballots at all.
    NoBallots,
    /// The per-rank preference columns do not have the same length.
    MismatchedColumns { expected: usize, actual: usize },
}

impl Error for ElectionError {}

impl Display for ElectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionError::EmptyElection => write!(f, "the election has no candidates"),
            ElectionError::EmptyCandidateName => {
                write!(f, "a candidate name may not be the empty string")
            }
            ElectionError::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is declared more than once", name)
            }
            ElectionError::NoBallots => write!(f, "the election has no ballots"),
            ElectionError::MismatchedColumns { expected, actual } => write!(
                f,
                "preference columns have mismatched lengths: expected {} entries, found {}",
                expected, actual
            ),
        }
    }
}
