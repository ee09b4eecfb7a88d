// ********* Input data structures ***********

use snafu::Snafu;
use std::cmp::Ordering;
use std::fmt::Display;

use crate::tally::VoteTally;

/// The identifier of a candidate, as assigned by the electoral authority.
///
/// The value 0 is reserved: inside a ballot it marks the point where the
/// preferences of this ballot stop.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

impl CandidateId {
    /// The reserved identifier that never designates a real candidate.
    pub const NONE: CandidateId = CandidateId(0);

    pub fn is_none(&self) -> bool {
        *self == CandidateId::NONE
    }
}

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CandidateId {
    fn from(id: u32) -> Self {
        CandidateId(id)
    }
}

/// A registered candidate.
///
/// Candidates are ordered by family name, then given names, then party and
/// finally by identifier. This order is used to iterate deterministically
/// over candidates and to break ties during the count.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub id: CandidateId,
    pub given_names: String,
    pub surname: String,
    pub party: String,
}

impl Candidate {
    pub fn new(id: u32, given_names: &str, surname: &str, party: &str) -> Candidate {
        Candidate {
            id: CandidateId(id),
            given_names: given_names.to_string(),
            surname: surname.to_string(),
            party: party.to_string(),
        }
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.surname
            .cmp(&other.surname)
            .then_with(|| self.given_names.cmp(&other.given_names))
            .then_with(|| self.party.cmp(&other.party))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.given_names, self.surname)
    }
}

// ******** Output data structures *********

/// What happened during one step of the count.
#[derive(PartialEq, Debug, Clone)]
pub enum StepOutcome {
    /// The distribution of first preferences. Only the first step has it.
    InitialAllocation,
    Elected(CandidateId),
    Excluded(CandidateId),
}

/// Where the ballots of an elected or excluded candidate went.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TransferStats {
    /// The weight received by each continuing candidate, in candidate order.
    pub transfers: Vec<(CandidateId, f64)>,
    /// The weight carried by the ballots that ran out of preferences.
    pub exhausted: f64,
}

impl TransferStats {
    pub(crate) fn record_transfer(&mut self, cid: CandidateId, weight: f64) {
        if let Some(e) = self.transfers.iter_mut().find(|(c, _)| *c == cid) {
            e.1 += weight;
        } else {
            self.transfers.push((cid, weight));
        }
    }

    pub fn total_transferred(&self) -> f64 {
        self.transfers.iter().map(|(_, w)| *w).sum()
    }
}

/// Statistics for one step of the count.
#[derive(PartialEq, Debug, Clone)]
pub struct CountStep {
    pub number: u32,
    pub outcome: StepOutcome,
    /// The tally once all the transfers of this step are done.
    pub tally: VoteTally,
    pub transfers: TransferStats,
}

impl CountStep {
    pub fn elected(&self) -> Option<CandidateId> {
        match self.outcome {
            StepOutcome::Elected(cid) => Some(cid),
            _ => None,
        }
    }

    pub fn excluded(&self) -> Option<CandidateId> {
        match self.outcome {
            StepOutcome::Excluded(cid) => Some(cid),
            _ => None,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct CountResult {
    pub vacancies: u32,
    pub quota: u64,
    /// All the candidates that took part in the count, in candidate order.
    pub candidates: Vec<Candidate>,
    pub steps: Vec<CountStep>,
    /// The elected candidates, in the order in which they were elected.
    pub elected: Vec<Candidate>,
}

impl CountResult {
    pub fn candidate(&self, cid: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == cid)
    }
}

/// Errors that prevent the count from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CountError {
    #[snafu(display("this count has already been run"))]
    AlreadyRun {},
    #[snafu(display("the number of vacancies must be positive"))]
    NoVacancies {},
    #[snafu(display("no candidates were provided"))]
    NoCandidates {},
    #[snafu(display("no ballots were provided"))]
    NoBallots {},
    #[snafu(display("{vacancies} vacancies cannot be filled by {candidates} candidates"))]
    TooFewCandidates { vacancies: u32, candidates: usize },
    #[snafu(display("candidate {id} was provided more than once"))]
    DuplicateCandidate { id: CandidateId },
    #[snafu(display("candidate {name} uses the reserved identifier 0"))]
    ReservedCandidateId { name: String },
    #[snafu(display(
        "no continuing candidates left after electing {elected} of {vacancies} vacancies"
    ))]
    ExhaustedCandidates { elected: usize, vacancies: u32 },
}
