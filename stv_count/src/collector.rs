use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::ballot::Ballot;
pub use crate::config::*;

/// How the raw ballots are turned into the ballots of the count.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CollectionMode {
    /// The group voting tickets followed by the below-the-line ballots.
    Standard,
    /// Only the below-the-line ballots are kept. The above-the-line votes are shared among
    /// the below-the-line ballots that start with the same candidate as the ticket.
    BelowTheLineOnly,
}

/// Counts gathered while collecting the ballots.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CollectionStats {
    pub ticket_ballots: usize,
    pub informal_tickets: usize,
    pub btl_ballots: usize,
    pub informal_btl_ballots: usize,
}

/// The inputs of a count, as assembled by a [BallotCollector].
#[derive(PartialEq, Debug, Clone)]
pub struct CollectedBallots {
    /// The candidates taking part in the count, in registration order.
    pub candidates: Vec<Candidate>,
    pub ballots: Vec<Ballot>,
    pub stats: CollectionStats,
}

#[derive(PartialEq, Debug, Clone)]
struct GroupTicket {
    group: String,
    ticket: u32,
    preferences: HashMap<CandidateId, u32>,
}

/// A builder for assembling the ballots of a senate election.
///
/// A group voting ticket stands for all the voters who marked the group above the line.
/// It becomes a single ballot weighted by the votes of its group, shared equally among the
/// tickets of this group.
///
/// ```
/// use stv_count::collector::{BallotCollector, CollectionMode};
/// use stv_count::{Candidate, CandidateId};
///
/// let mut collector = BallotCollector::new().candidates(&[
///     Candidate::new(1, "Anne", "Smith", "ALP"),
///     Candidate::new(2, "Bob", "Jones", "LIB"),
/// ]);
///
/// collector.add_btl_ballot([(CandidateId(1), 1), (CandidateId(2), 2)].into_iter().collect());
///
/// let collected = collector.collect(CollectionMode::Standard);
/// assert_eq!(collected.ballots.len(), 1);
///
/// let result = stv_count::run_count(1, &collected.candidates, collected.ballots)?;
/// assert_eq!(result.elected[0].surname, "Smith");
/// # Ok::<(), stv_count::CountError>(())
/// ```
#[derive(PartialEq, Debug, Clone, Default)]
pub struct BallotCollector {
    candidates: Vec<Candidate>,
    tickets: Vec<GroupTicket>,
    group_votes: HashMap<String, f64>,
    btl_preferences: Vec<HashMap<CandidateId, u32>>,
}

impl BallotCollector {
    pub fn new() -> BallotCollector {
        BallotCollector::default()
    }

    /// Sets the registered candidates.
    pub fn candidates(self, cands: &[Candidate]) -> BallotCollector {
        BallotCollector {
            candidates: cands.to_vec(),
            ..self
        }
    }

    /// Adds one of the tickets lodged by a group.
    pub fn add_group_ticket(
        &mut self,
        group: &str,
        ticket: u32,
        preferences: HashMap<CandidateId, u32>,
    ) {
        self.tickets.push(GroupTicket {
            group: group.to_string(),
            ticket,
            preferences,
        });
    }

    /// Sets the number of votes a group received above the line.
    ///
    /// Setting it again for the same group replaces the previous value.
    pub fn set_group_votes(&mut self, group: &str, votes: f64) {
        if let Some(previous) = self.group_votes.insert(group.to_string(), votes) {
            debug!(
                "set_group_votes: group {}: replacing {} votes with {}",
                group, previous, votes
            );
        }
    }

    /// Adds the preferences marked below the line by one voter.
    pub fn add_btl_ballot(&mut self, preferences: HashMap<CandidateId, u32>) {
        self.btl_preferences.push(preferences);
    }

    pub fn collect(&self, mode: CollectionMode) -> CollectedBallots {
        let mut stats = CollectionStats::default();
        let candidates = self.selected_candidates();

        let ticket_ballots = self.ticket_ballots(&mut stats);

        let mut btl_ballots: Vec<Ballot> = Vec::new();
        for preferences in self.btl_preferences.iter() {
            match Ballot::from_preferences(1.0, preferences) {
                Some(b) => btl_ballots.push(b),
                None => stats.informal_btl_ballots += 1,
            }
        }
        stats.btl_ballots = btl_ballots.len();

        let ballots = match mode {
            CollectionMode::Standard => {
                let mut all = ticket_ballots;
                all.extend(btl_ballots);
                all
            }
            CollectionMode::BelowTheLineOnly => {
                stats.ticket_ballots = 0;
                share_ticket_votes(&ticket_ballots, btl_ballots)
            }
        };

        info!(
            "Collected {} ballots from {} tickets and {} below the line ballots ({:?})",
            ballots.len(),
            stats.ticket_ballots,
            stats.btl_ballots,
            mode
        );
        if stats.informal_tickets > 0 || stats.informal_btl_ballots > 0 {
            warn!(
                "Informal ballots dropped: {} tickets, {} below the line",
                stats.informal_tickets, stats.informal_btl_ballots
            );
        }

        CollectedBallots {
            candidates,
            ballots,
            stats,
        }
    }

    // With tickets, only the candidates that appear on them take part.
    fn selected_candidates(&self) -> Vec<Candidate> {
        if self.tickets.is_empty() {
            return self.candidates.clone();
        }
        let on_tickets: HashSet<CandidateId> = self
            .tickets
            .iter()
            .flat_map(|t| t.preferences.keys().cloned())
            .collect();
        self.candidates
            .iter()
            .filter(|c| on_tickets.contains(&c.id))
            .cloned()
            .collect()
    }

    fn ticket_ballots(&self, stats: &mut CollectionStats) -> Vec<Ballot> {
        let mut tickets_per_group: HashMap<&str, usize> = HashMap::new();
        for t in self.tickets.iter() {
            *tickets_per_group.entry(t.group.as_str()).or_insert(0) += 1;
        }

        let mut res: Vec<Ballot> = Vec::new();
        for t in self.tickets.iter() {
            let num_tickets = tickets_per_group.get(t.group.as_str()).cloned().unwrap_or(1);
            let votes = self.group_votes.get(&t.group).cloned().unwrap_or(0.0);
            let weight = votes / num_tickets as f64;
            match Ballot::from_preferences(weight, &t.preferences) {
                Some(b) => res.push(b),
                None => {
                    warn!(
                        "Ticket {} of group {} is informal, dropping it",
                        t.ticket, t.group
                    );
                    stats.informal_tickets += 1;
                }
            }
        }
        stats.ticket_ballots = res.len();
        res
    }
}

/// Replaces the ticket ballots by extra weight on the below-the-line ballots that start with
/// the same candidate.
fn share_ticket_votes(tickets: &[Ballot], btl_ballots: Vec<Ballot>) -> Vec<Ballot> {
    let mut atl_totals: HashMap<CandidateId, f64> = HashMap::new();
    for b in tickets.iter() {
        if let Some(cid) = b.current_candidate() {
            *atl_totals.entry(cid).or_insert(0.0) += b.intrinsic_weight();
        }
    }
    let mut btl_counts: HashMap<CandidateId, usize> = HashMap::new();
    for b in btl_ballots.iter() {
        if let Some(cid) = b.current_candidate() {
            *btl_counts.entry(cid).or_insert(0) += 1;
        }
    }
    debug!(
        "share_ticket_votes: atl totals: {:?} btl counts: {:?}",
        atl_totals, btl_counts
    );

    btl_ballots
        .into_iter()
        .map(|b| {
            let extra = match b.current_candidate() {
                Some(cid) => {
                    let atl = atl_totals.get(&cid).cloned().unwrap_or(0.0);
                    let count = btl_counts.get(&cid).cloned().unwrap_or(1);
                    atl / count as f64
                }
                None => 0.0,
            };
            Ballot::new(1.0 + extra, b.candidate_order().to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_count;

    fn prefs(order: &[u32]) -> HashMap<CandidateId, u32> {
        order
            .iter()
            .enumerate()
            .map(|(idx, cid)| (CandidateId(*cid), idx as u32 + 1))
            .collect()
    }

    fn tasmania() -> BallotCollector {
        let mut collector = BallotCollector::new().candidates(&[
            Candidate::new(101, "Anne", "SMITH", "ALP"),
            Candidate::new(102, "Bob", "JONES", "ALP"),
            Candidate::new(201, "Carol", "BROWN", "LIB"),
            Candidate::new(202, "Dave", "GREEN", "LIB"),
            Candidate::new(301, "Eve", "WHITE", "GRN"),
        ]);
        collector.add_group_ticket("A", 1, prefs(&[101, 102, 301, 201, 202]));
        collector.add_group_ticket("B", 1, prefs(&[201, 202, 102, 101, 301]));
        collector.add_group_ticket("B", 2, prefs(&[201, 202, 301, 101, 102]));
        collector.add_group_ticket("C", 1, prefs(&[301, 101, 102, 201, 202]));
        collector.set_group_votes("A", 40.0);
        collector.set_group_votes("B", 30.0);
        collector.set_group_votes("C", 15.0);
        collector.add_btl_ballot(prefs(&[301, 102, 101]));
        collector.add_btl_ballot(prefs(&[202, 201]));
        let mut informal = prefs(&[101]);
        informal.insert(CandidateId(102), 1);
        collector.add_btl_ballot(informal);
        collector.add_btl_ballot(prefs(&[202, 301]));
        collector
    }

    fn surnames(cands: &[Candidate]) -> Vec<&str> {
        cands.iter().map(|c| c.surname.as_str()).collect()
    }

    #[test]
    fn tickets_share_the_group_votes() {
        let collected = tasmania().collect(CollectionMode::Standard);
        let weights: Vec<f64> = collected
            .ballots
            .iter()
            .map(|b| b.intrinsic_weight())
            .collect();
        assert_eq!(weights, vec![40.0, 15.0, 15.0, 15.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            collected.stats,
            CollectionStats {
                ticket_ballots: 4,
                informal_tickets: 0,
                btl_ballots: 3,
                informal_btl_ballots: 1,
            }
        );
    }

    #[test]
    fn standard_count() {
        let collected = tasmania().collect(CollectionMode::Standard);
        let res = run_count(2, &collected.candidates, collected.ballots).unwrap();
        assert_eq!(res.quota, 30);
        assert_eq!(surnames(&res.elected), vec!["SMITH", "BROWN"]);
        assert_eq!(res.steps.len(), 4);
        assert_eq!(res.steps[2].excluded(), Some(CandidateId(202)));
    }

    #[test]
    fn below_the_line_only_count() {
        let collected = tasmania().collect(CollectionMode::BelowTheLineOnly);
        assert_eq!(collected.stats.ticket_ballots, 0);
        let weights: Vec<f64> = collected
            .ballots
            .iter()
            .map(|b| b.intrinsic_weight())
            .collect();
        // WHITE gets the 15 votes of group C, GREEN has no ticket leading with him.
        assert_eq!(weights, vec![16.0, 1.0, 1.0]);

        let res = run_count(2, &collected.candidates, collected.ballots).unwrap();
        assert_eq!(res.quota, 7);
        assert_eq!(surnames(&res.elected), vec!["WHITE", "JONES"]);
    }

    #[test]
    fn candidates_come_from_the_tickets() {
        let mut collector = tasmania();
        collector.candidates.push(Candidate::new(401, "Zoe", "ADAMS", "IND"));
        let collected = collector.collect(CollectionMode::Standard);
        assert_eq!(collected.candidates.len(), 5);
        assert!(collected.candidates.iter().all(|c| c.id != CandidateId(401)));

        let mut no_tickets = BallotCollector::new().candidates(&[
            Candidate::new(1, "A", "A", ""),
            Candidate::new(2, "B", "B", ""),
        ]);
        no_tickets.add_btl_ballot(prefs(&[2]));
        assert_eq!(no_tickets.collect(CollectionMode::Standard).candidates.len(), 2);
    }

    #[test]
    fn groups_without_votes_weigh_nothing() {
        let mut collector = BallotCollector::new().candidates(&[Candidate::new(1, "A", "A", "")]);
        collector.add_group_ticket("X", 1, prefs(&[1]));
        collector.set_group_votes("Y", 12.0);
        collector.set_group_votes("Y", 10.0);
        let collected = collector.collect(CollectionMode::Standard);
        assert_eq!(collected.ballots[0].intrinsic_weight(), 0.0);
        assert_eq!(collector.group_votes.get("Y"), Some(&10.0));
    }

    #[test]
    fn informal_tickets_are_dropped() {
        let mut collector = BallotCollector::new().candidates(&[
            Candidate::new(1, "A", "A", ""),
            Candidate::new(2, "B", "B", ""),
        ]);
        let mut bad = prefs(&[1]);
        bad.insert(CandidateId(2), 1);
        collector.add_group_ticket("X", 1, bad);
        collector.add_group_ticket("X", 2, prefs(&[2, 1]));
        collector.set_group_votes("X", 10.0);
        let collected = collector.collect(CollectionMode::Standard);
        assert_eq!(collected.stats.informal_tickets, 1);
        assert_eq!(collected.stats.ticket_ballots, 1);
        // The weight is still shared with the informal ticket.
        assert_eq!(collected.ballots[0].intrinsic_weight(), 5.0);
    }
}
