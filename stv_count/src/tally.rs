use std::cmp::Ordering;

use crate::config::CandidateId;

/// A snapshot of the votes held by each continuing candidate.
///
/// Candidates must be inserted in candidate order. When several candidates
/// share the highest (or lowest) value, the one inserted first is kept, so
/// ties resolve to the candidate that sorts first.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct VoteTally {
    votes: Vec<(CandidateId, f64)>,
    lowest: Option<usize>,
    highest: Option<usize>,
}

impl VoteTally {
    pub fn new() -> VoteTally {
        VoteTally::default()
    }

    pub fn put(&mut self, cid: CandidateId, votes: f64) {
        let idx = self.votes.len();
        self.votes.push((cid, votes));
        match self.lowest.map(|l| self.votes[l].1) {
            Some(low) if votes >= low => {}
            _ => self.lowest = Some(idx),
        }
        match self.highest.map(|h| self.votes[h].1) {
            Some(high) if votes <= high => {}
            _ => self.highest = Some(idx),
        }
    }

    pub fn get(&self, cid: CandidateId) -> Option<f64> {
        self.votes
            .iter()
            .find(|(c, _)| *c == cid)
            .map(|(_, vc)| *vc)
    }

    pub fn highest(&self) -> Option<(CandidateId, f64)> {
        self.highest.map(|idx| self.votes[idx])
    }

    pub fn lowest(&self) -> Option<(CandidateId, f64)> {
        self.lowest.map(|idx| self.votes[idx])
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.votes.iter().map(|(_, vc)| *vc).sum()
    }

    /// The entries in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = &(CandidateId, f64)> {
        self.votes.iter()
    }

    /// The entries by decreasing number of votes. Equal values keep the candidate order.
    pub fn sorted_descending(&self) -> Vec<(CandidateId, f64)> {
        let mut res = self.votes.clone();
        res.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        res
    }
}
