use log::{debug, info};
use snafu::{ensure, OptionExt};
use std::collections::HashMap;

use crate::ballot::Ballot;
use crate::config::*;
use crate::tally::VoteTally;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum CounterState {
    Initialized,
    Counting,
    Complete,
}

/// Computes the quota for the given total weight of ballots.
///
/// The remainder of the division is dropped on purpose: this is not the Droop quota with
/// fractional votes.
pub fn compute_quota(total_weight: f64, vacancies: u32) -> u64 {
    (total_weight.ceil() as u64 / (vacancies as u64 + 1)) + 1
}

/// An engine performing a count, given a number of vacancies, a set of candidates and a list
/// of ballots.
///
/// The engine owns the ballots. Each continuing candidate has a bucket holding the indices of
/// the ballots that currently count for them. Once run, a `BallotCounter` cannot be run again.
pub struct BallotCounter {
    state: CounterState,
    vacancies: u32,
    quota: u64,
    // In candidate order.
    candidates: Vec<Candidate>,
    candidate_ranks: HashMap<CandidateId, usize>,
    ballots: Vec<Ballot>,
    buckets: HashMap<CandidateId, Vec<usize>>,
    steps: Vec<CountStep>,
    elected: Vec<CandidateId>,
}

impl BallotCounter {
    pub fn new(
        vacancies: u32,
        candidates: &[Candidate],
        ballots: Vec<Ballot>,
    ) -> Result<BallotCounter, CountError> {
        ensure!(vacancies > 0, NoVacanciesSnafu {});
        ensure!(!candidates.is_empty(), NoCandidatesSnafu {});
        ensure!(!ballots.is_empty(), NoBallotsSnafu {});

        let mut sorted_candidates: Vec<Candidate> = candidates.to_vec();
        sorted_candidates.sort();
        let mut candidate_ranks: HashMap<CandidateId, usize> = HashMap::new();
        for (idx, c) in sorted_candidates.iter().enumerate() {
            ensure!(
                !c.id.is_none(),
                ReservedCandidateIdSnafu {
                    name: c.to_string()
                }
            );
            ensure!(
                candidate_ranks.insert(c.id, idx).is_none(),
                DuplicateCandidateSnafu { id: c.id }
            );
        }
        ensure!(
            vacancies as usize <= sorted_candidates.len(),
            TooFewCandidatesSnafu {
                vacancies,
                candidates: sorted_candidates.len()
            }
        );

        let total_weight: f64 = ballots.iter().map(|b| b.current_weight()).sum();
        let quota = compute_quota(total_weight, vacancies);

        let mut buckets: HashMap<CandidateId, Vec<usize>> = sorted_candidates
            .iter()
            .map(|c| (c.id, Vec::new()))
            .collect();
        let mut num_unallocated: usize = 0;
        for (idx, ballot) in ballots.iter().enumerate() {
            match ballot
                .current_candidate()
                .and_then(|cid| buckets.get_mut(&cid))
            {
                Some(bucket) => bucket.push(idx),
                None => num_unallocated += 1,
            }
        }
        debug!(
            "BallotCounter::new: total weight: {:?} quota: {:?} ballots: {:?} unallocated: {:?}",
            total_weight,
            quota,
            ballots.len(),
            num_unallocated
        );

        Ok(BallotCounter {
            state: CounterState::Initialized,
            vacancies,
            quota,
            candidates: sorted_candidates,
            candidate_ranks,
            ballots,
            buckets,
            steps: Vec::new(),
            elected: Vec::new(),
        })
    }

    pub fn quota(&self) -> u64 {
        self.quota
    }

    pub fn vacancies(&self) -> u32 {
        self.vacancies
    }

    /// Runs the count until all the vacancies are filled.
    pub fn run(&mut self) -> Result<CountResult, CountError> {
        ensure!(self.state == CounterState::Initialized, AlreadyRunSnafu {});
        self.state = CounterState::Counting;
        info!(
            "Counting {} ballots for {} vacancies among {} candidates, quota: {}",
            self.ballots.len(),
            self.vacancies,
            self.candidates.len(),
            self.quota
        );

        let res = self.run_steps();
        self.state = CounterState::Complete;
        res
    }

    fn run_steps(&mut self) -> Result<CountResult, CountError> {
        let initial = CountStep {
            number: 0,
            outcome: StepOutcome::InitialAllocation,
            tally: self.current_tally(),
            transfers: TransferStats::default(),
        };
        debug!("run_steps: initial tally: {:?}", initial.tally);
        self.steps.push(initial);

        let mut step_number: u32 = 0;
        while self.elected.len() < self.vacancies as usize {
            step_number += 1;
            let step = self.count_step(step_number)?;
            debug!("run_steps: step {}: {:?}", step_number, step);
            self.steps.push(step);
        }
        Ok(self.bundle_result())
    }

    fn count_step(&mut self, number: u32) -> Result<CountStep, CountError> {
        let tally = self.current_tally();
        let (leader, leader_votes) = tally.highest().context(ExhaustedCandidatesSnafu {
            elected: self.elected.len(),
            vacancies: self.vacancies,
        })?;

        let (outcome, transfers) = if leader_votes > self.quota as f64 {
            info!(
                "Count {}: {} elected with {:.3} votes",
                number,
                self.name(leader),
                leader_votes
            );
            let transfers = self.distribute_after_election(leader, leader_votes);
            (StepOutcome::Elected(leader), transfers)
        } else if self.buckets.len() == 1 {
            // The last continuing candidate takes the last seat.
            ensure!(
                self.elected.len() + 1 == self.vacancies as usize,
                ExhaustedCandidatesSnafu {
                    elected: self.elected.len(),
                    vacancies: self.vacancies,
                }
            );
            info!(
                "Count {}: {} elected as the last continuing candidate",
                number,
                self.name(leader)
            );
            (StepOutcome::Elected(leader), TransferStats::default())
        } else {
            let (loser, loser_votes) = tally.lowest().context(ExhaustedCandidatesSnafu {
                elected: self.elected.len(),
                vacancies: self.vacancies,
            })?;
            info!(
                "Count {}: {} excluded with {:.3} votes",
                number,
                self.name(loser),
                loser_votes
            );
            let transfers = self.distribute_after_exclusion(loser);
            (StepOutcome::Excluded(loser), transfers)
        };

        if let StepOutcome::Elected(cid) = outcome {
            self.elected.push(cid);
        }

        // The tally of the step is taken once all the transfers are done.
        Ok(CountStep {
            number,
            outcome,
            tally: self.current_tally(),
            transfers,
        })
    }

    /// Distributes the surplus of an elected candidate at a reduced transfer value, and
    /// removes them from the continuing candidates.
    fn distribute_after_election(&mut self, cid: CandidateId, total_votes: f64) -> TransferStats {
        let bucket = self.buckets.remove(&cid).unwrap_or_default();
        let surplus = total_votes - self.quota as f64;
        let mut stats = TransferStats::default();
        if surplus > 0.0 {
            let transfer_factor = surplus / total_votes;
            debug!(
                "distribute_after_election: {}: surplus: {:?} transfer factor: {:?}",
                cid, surplus, transfer_factor
            );
            for idx in bucket {
                self.distribute_ballot(idx, transfer_factor, &mut stats);
            }
        }
        self.sort_transfers(&mut stats);
        stats
    }

    fn distribute_after_exclusion(&mut self, cid: CandidateId) -> TransferStats {
        let bucket = self.buckets.remove(&cid).unwrap_or_default();
        let mut stats = TransferStats::default();
        for idx in bucket {
            self.distribute_ballot(idx, 1.0, &mut stats);
        }
        self.sort_transfers(&mut stats);
        stats
    }

    /// Moves a ballot to its next continuing preference. The transfer factor is applied once,
    /// when the ballot lands in a bucket.
    fn distribute_ballot(&mut self, idx: usize, transfer_factor: f64, stats: &mut TransferStats) {
        let ballot = &mut self.ballots[idx];
        loop {
            ballot.advance();
            match ballot.current_candidate() {
                None => {
                    stats.exhausted += ballot.current_weight() * transfer_factor;
                    return;
                }
                Some(cid) => {
                    if let Some(bucket) = self.buckets.get_mut(&cid) {
                        ballot.apply_transfer_factor(transfer_factor);
                        stats.record_transfer(cid, ballot.current_weight());
                        bucket.push(idx);
                        return;
                    }
                    // Already elected or excluded: look at the next preference.
                }
            }
        }
    }

    fn sort_transfers(&self, stats: &mut TransferStats) {
        stats
            .transfers
            .sort_by_key(|(cid, _)| self.candidate_ranks.get(cid).cloned().unwrap_or(usize::MAX));
    }

    fn current_tally(&self) -> VoteTally {
        let mut tally = VoteTally::new();
        for c in self.candidates.iter() {
            if let Some(bucket) = self.buckets.get(&c.id) {
                let votes: f64 = bucket
                    .iter()
                    .map(|idx| self.ballots[*idx].current_weight())
                    .sum();
                tally.put(c.id, votes);
            }
        }
        tally
    }

    fn candidate(&self, cid: CandidateId) -> Option<&Candidate> {
        self.candidate_ranks
            .get(&cid)
            .and_then(|idx| self.candidates.get(*idx))
    }

    fn name(&self, cid: CandidateId) -> String {
        self.candidate(cid)
            .map(|c| c.to_string())
            .unwrap_or_else(|| cid.to_string())
    }

    fn bundle_result(&mut self) -> CountResult {
        let elected: Vec<Candidate> = self
            .elected
            .iter()
            .filter_map(|cid| self.candidate(*cid).cloned())
            .collect();
        CountResult {
            vacancies: self.vacancies,
            quota: self.quota,
            candidates: self.candidates.clone(),
            steps: std::mem::take(&mut self.steps),
            elected,
        }
    }
}
