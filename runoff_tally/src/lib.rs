//! Instant-runoff tabulation for a small fixed slate of candidates.
//!
//! Ballots carry an ordered list of preferences. Each round tallies the
//! active preference of every ballot; a candidate whose share clears the
//! majority bar wins, otherwise the weakest candidate is eliminated and its
//! ballots transfer to their next preference. Both tie-breakers (weakest
//! candidate, dead-even slate) draw from an injected random generator.

mod builder;
mod config;
mod report;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::ops::{Add, AddAssign};

pub use crate::builder::Builder;
pub use crate::config::*;
pub use crate::report::*;

// **** Private structures ****

type RoundId = u32;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

/// One rank inside a ballot, after the names have been resolved against the
/// slate.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
enum Slot {
    /// The no-vote sentinel.
    Blank,
    /// A name that matched no declared candidate. It occupies its rank but
    /// can never receive a vote.
    Undeclared,
    Filled(CandidateId),
}

/// A ballot with its resolved ranks and a cursor on the rank currently
/// counted. The cursor only moves forward.
#[derive(Eq, PartialEq, Debug, Clone)]
struct BallotState {
    slots: Vec<Slot>,
    cursor: usize,
}

impl BallotState {
    /// The candidate this ballot currently counts for, if the active rank
    /// holds one.
    fn current_candidate(&self) -> Option<CandidateId> {
        match self.slots.get(self.cursor) {
            Some(Slot::Filled(cid)) => Some(*cid),
            _ => None,
        }
    }

    /// Advances the cursor past every consecutive occurrence of the
    /// eliminated candidate. Ballots assigned to anyone else are untouched,
    /// so reapplying with the same candidate is a no-op.
    fn transfer_from(&mut self, eliminated: CandidateId) {
        if self.current_candidate() != Some(eliminated) {
            return;
        }
        while let Some(Slot::Filled(cid)) = self.slots.get(self.cursor) {
            if *cid != eliminated {
                break;
            }
            self.cursor += 1;
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

// **** Validation ****

/// Resolves the slate and the ballots into their internal form, failing fast
/// on anything malformed. Candidates keep their input order. Ballot names
/// that match no candidate are kept as undeclared ranks.
fn check_input(
    candidates: &[String],
    ballots: &[Ballot],
) -> Result<(Vec<(String, CandidateId)>, Vec<BallotState>), ElectionError> {
    if candidates.is_empty() {
        return Err(ElectionError::EmptyElection);
    }
    let mut by_name: HashMap<String, CandidateId> = HashMap::new();
    let mut roster: Vec<(String, CandidateId)> = Vec::new();
    for (idx, name) in candidates.iter().enumerate() {
        if name.is_empty() {
            return Err(ElectionError::EmptyCandidateName);
        }
        let cid = CandidateId((idx + 1) as u32);
        if by_name.insert(name.clone(), cid).is_some() {
            return Err(ElectionError::DuplicateCandidate(name.clone()));
        }
        roster.push((name.clone(), cid));
    }
    if ballots.is_empty() {
        return Err(ElectionError::NoBallots);
    }

    let mut states: Vec<BallotState> = Vec::with_capacity(ballots.len());
    for (idx, ballot) in ballots.iter().enumerate() {
        let slots: Vec<Slot> = ballot
            .rankings
            .iter()
            .map(|choice| match choice {
                BallotChoice::NoVote => Slot::Blank,
                BallotChoice::Candidate(name) => match by_name.get(name) {
                    Some(cid) => Slot::Filled(*cid),
                    None => {
                        debug!(
                            "check_input: ballot {}: {:?} is not on the slate, the rank counts for no one",
                            idx, name
                        );
                        Slot::Undeclared
                    }
                },
            })
            .collect();
        states.push(BallotState { slots, cursor: 0 });
    }
    debug!(
        "check_input: {} candidates, {} ballots",
        roster.len(),
        states.len()
    );
    Ok((roster, states))
}

// **** Round computations ****

/// Counts the active preferences over the live slate. The tally is
/// index-aligned with the slate; ballots pointing at anything else (blank,
/// undeclared, or a previously eliminated candidate) contribute to no count.
fn compute_tally(ballots: &[BallotState], slate: &[(String, CandidateId)]) -> Vec<VoteCount> {
    let index_of: HashMap<CandidateId, usize> = slate
        .iter()
        .enumerate()
        .map(|(idx, (_, cid))| (*cid, idx))
        .collect();
    let mut tally = vec![VoteCount::EMPTY; slate.len()];
    for b in ballots.iter() {
        if let Some(cid) = b.current_candidate() {
            if let Some(&idx) = index_of.get(&cid) {
                tally[idx] += VoteCount(1);
            }
        }
    }
    tally
}

fn all_equal(tally: &[VoteCount]) -> bool {
    tally.iter().all(|vc| *vc == tally[0])
}

/// The majority test: the share of the round total, rounded to one decimal
/// digit, must strictly exceed one half. A candidate at exactly 50.0% does
/// not win. Callers guarantee a nonzero total.
fn majority_index(tally: &[VoteCount]) -> Option<usize> {
    let total: VoteCount = tally.iter().cloned().sum();
    debug_assert!(total > VoteCount::EMPTY);
    for (idx, vc) in tally.iter().enumerate() {
        let share = vc.0 as f64 / total.0 as f64;
        if (share * 10.0).round() / 10.0 > 0.5 {
            return Some(idx);
        }
    }
    None
}

/// Picks this round's winner, if there is one. A dead-even slate elects a
/// candidate by lot; otherwise the majority test decides.
fn select_winner<R: Rng>(tally: &[VoteCount], rng: &mut R) -> Option<usize> {
    if all_equal(tally) {
        let idx = rng.gen_range(0..tally.len());
        debug!("select_winner: all {} candidates tied, drew {}", tally.len(), idx);
        return Some(idx);
    }
    majority_index(tally)
}

/// Finds the index holding the fewest votes, drawing uniformly among ties.
/// A tally of length 1 returns index 0.
fn lowest_tally_index<R: Rng>(tally: &[VoteCount], rng: &mut R) -> usize {
    let min_count: VoteCount = *tally.iter().min().unwrap();
    let all_smallest: Vec<usize> = tally
        .iter()
        .enumerate()
        .filter_map(|(idx, vc)| if *vc == min_count { Some(idx) } else { None })
        .collect();
    debug!("lowest_tally_index: smallest indices: {:?}", all_smallest);
    all_smallest[rng.gen_range(0..all_smallest.len())]
}

/// Removes the candidate at `index`, preserving the order of the rest.
fn remove_candidate(
    slate: &[(String, CandidateId)],
    index: usize,
) -> Vec<(String, CandidateId)> {
    slate
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| if idx == index { None } else { Some(p.clone()) })
        .collect()
}

/// Produces the next round's ballot snapshot: every ballot assigned to the
/// eliminated candidate advances to its next preference.
fn transfer_votes(ballots: &[BallotState], eliminated: CandidateId) -> Vec<BallotState> {
    ballots
        .iter()
        .map(|b| {
            let mut nb = b.clone();
            nb.transfer_from(eliminated);
            nb
        })
        .collect()
}

fn display_slot(slot: Option<&Slot>, names_by_id: &HashMap<CandidateId, String>) -> String {
    match slot {
        Some(Slot::Filled(cid)) => names_by_id
            .get(cid)
            .cloned()
            .unwrap_or_else(|| "?".to_string()),
        Some(Slot::Undeclared) => "?".to_string(),
        Some(Slot::Blank) | None => "-".to_string(),
    }
}

fn build_slate(
    round: RoundId,
    slate: &[(String, CandidateId)],
    ballots: &[BallotState],
    names_by_id: &HashMap<CandidateId, String>,
) -> RoundSlate {
    let max_ranks = ballots.iter().map(|b| b.slots.len()).max().unwrap_or(0);
    let mut columns: Vec<Vec<String>> = Vec::new();
    columns.push(
        ballots
            .iter()
            .map(|b| display_slot(b.slots.get(b.cursor), names_by_id))
            .collect(),
    );
    for rank in 1..max_ranks {
        columns.push(
            ballots
                .iter()
                .map(|b| display_slot(b.slots.get(rank), names_by_id))
                .collect(),
        );
    }
    RoundSlate {
        round,
        candidates: slate.iter().map(|(name, _)| name.clone()).collect(),
        columns,
    }
}

// **** Orchestrator ****

/// Runs the election with the default random source.
///
/// Arguments:
/// * `candidates` the slate, unique non-empty names, order significant
/// * `ballots` one entry per voter
/// * `sink` receives the winner/elimination reports and the verbose slates
pub fn run_election(
    candidates: &[String],
    ballots: &[Ballot],
    sink: &mut dyn ReportSink,
) -> Result<ElectionResult, ElectionError> {
    run_election_with_rng(candidates, ballots, sink, &mut rand::thread_rng())
}

/// Runs the election with a seeded generator, for reproducible tie-breaks.
pub fn run_election_seeded(
    candidates: &[String],
    ballots: &[Ballot],
    sink: &mut dyn ReportSink,
    seed: u64,
) -> Result<ElectionResult, ElectionError> {
    run_election_with_rng(candidates, ballots, sink, &mut StdRng::seed_from_u64(seed))
}

/// Runs the election rounds with the given random source.
///
/// Each iteration tallies the active preferences, declares a winner if one
/// exists, and otherwise eliminates the weakest candidate and transfers its
/// ballots. The loop ends with a winner, or without one once no ballot still
/// counts for a live candidate.
pub fn run_election_with_rng<R: Rng>(
    candidates: &[String],
    ballots: &[Ballot],
    sink: &mut dyn ReportSink,
    rng: &mut R,
) -> Result<ElectionResult, ElectionError> {
    info!(
        "run_election: {} candidates, {} ballots",
        candidates.len(),
        ballots.len()
    );
    let (roster, states) = check_input(candidates, ballots)?;
    let names_by_id: HashMap<CandidateId, String> = roster
        .iter()
        .map(|(name, cid)| (*cid, name.clone()))
        .collect();

    let mut cur_slate: Vec<(String, CandidateId)> = roster;
    let mut cur_ballots: Vec<BallotState> = states;
    let mut round_stats: Vec<RoundStats> = Vec::new();

    loop {
        let round_id = (round_stats.len() + 1) as RoundId;
        info!(
            "round {}: slate: {:?}",
            round_id,
            cur_slate.iter().map(|(name, _)| name).collect::<Vec<_>>()
        );
        sink.slate(&build_slate(round_id, &cur_slate, &cur_ballots, &names_by_id));

        let tally = compute_tally(&cur_ballots, &cur_slate);
        debug!("round {}: tally: {:?}", round_id, tally);
        let total: VoteCount = tally.iter().cloned().sum();

        let mut stats = RoundStats {
            round: round_id,
            tally: cur_slate
                .iter()
                .zip(tally.iter())
                .map(|((name, _), vc)| (name.clone(), vc.0))
                .collect(),
            total_votes: total.0,
            elected: None,
            eliminated: None,
        };

        if total == VoteCount::EMPTY {
            warn!(
                "round {}: no ballot counts for a live candidate, ending without a winner",
                round_id
            );
            round_stats.push(stats);
            return Ok(ElectionResult {
                winner: None,
                round_stats,
            });
        }

        if let Some(idx) = select_winner(&tally, rng) {
            let name = cur_slate[idx].0.clone();
            info!(
                "round {}: {} wins with {} votes out of {}",
                round_id, name, tally[idx].0, total.0
            );
            sink.winner(&name, tally[idx].0, total.0);
            stats.elected = Some(name.clone());
            round_stats.push(stats);
            return Ok(ElectionResult {
                winner: Some(name),
                round_stats,
            });
        }

        // No winner: drop the weakest candidate and transfer its ballots.
        let low = lowest_tally_index(&tally, rng);
        let (low_name, low_cid) = cur_slate[low].clone();
        info!(
            "round {}: eliminating {} with {} votes out of {}",
            round_id, low_name, tally[low].0, total.0
        );
        sink.eliminated(&low_name, tally[low].0, total.0);
        stats.eliminated = Some(low_name);
        round_stats.push(stats);

        let next_slate = remove_candidate(&cur_slate, low);
        assert!(
            next_slate.len() == cur_slate.len() - 1,
            "The slate did not shrink: {:?} -> {:?}",
            cur_slate,
            next_slate
        );
        cur_ballots = transfer_votes(&cur_ballots, low_cid);
        cur_slate = next_slate;
    }
}
