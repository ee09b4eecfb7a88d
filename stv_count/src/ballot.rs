use std::collections::HashMap;

use crate::config::CandidateId;
use crate::preferences::candidate_order_from_preferences;

/// A ballot, together with its state in a count.
///
/// - `intrinsic_weight` never changes during the count. It is 1.0 for a normal ballot, but
///   group voting tickets are represented by a single ballot weighted by the above-the-line
///   votes it received.
/// - `candidate_order` lists the candidates from the most preferred one. It is obtained from
///   the raw preferences through [candidate_order_from_preferences].
/// - `cursor` points at the candidate currently holding this ballot.
/// - `transfer_weight` accumulates the transfer values applied when the ballot moves
///   after an election.
#[derive(PartialEq, Debug, Clone)]
pub struct Ballot {
    intrinsic_weight: f64,
    candidate_order: Vec<CandidateId>,
    cursor: usize,
    transfer_weight: f64,
}

impl Ballot {
    pub fn new(intrinsic_weight: f64, candidate_order: Vec<CandidateId>) -> Ballot {
        Ballot {
            intrinsic_weight,
            candidate_order,
            cursor: 0,
            transfer_weight: 1.0,
        }
    }

    /// A ballot from a single voter.
    pub fn single(candidate_order: Vec<CandidateId>) -> Ballot {
        Ballot::new(1.0, candidate_order)
    }

    /// Builds a ballot from the raw preferences, or None if the preferences are informal.
    pub fn from_preferences(
        intrinsic_weight: f64,
        preferences: &HashMap<CandidateId, u32>,
    ) -> Option<Ballot> {
        candidate_order_from_preferences(preferences).map(|order| Ballot::new(intrinsic_weight, order))
    }

    /// The candidate currently preferenced, or None if the ballot is exhausted.
    pub fn current_candidate(&self) -> Option<CandidateId> {
        match self.candidate_order.get(self.cursor) {
            Some(cid) if !cid.is_none() => Some(*cid),
            _ => None,
        }
    }

    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    pub fn apply_transfer_factor(&mut self, factor: f64) {
        self.transfer_weight *= factor;
    }

    pub fn current_weight(&self) -> f64 {
        self.intrinsic_weight * self.transfer_weight
    }

    pub fn intrinsic_weight(&self) -> f64 {
        self.intrinsic_weight
    }

    pub fn transfer_weight(&self) -> f64 {
        self.transfer_weight
    }

    pub fn candidate_order(&self) -> &[CandidateId] {
        &self.candidate_order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[u32]) -> Vec<CandidateId> {
        ids.iter().map(|x| CandidateId(*x)).collect()
    }

    #[test]
    fn fresh_ballot_weight_is_intrinsic() {
        let b = Ballot::new(2.5, order(&[3, 1]));
        assert_eq!(b.current_weight(), 2.5);
        assert_eq!(b.transfer_weight(), 1.0);
        assert_eq!(b.cursor(), 0);
        assert_eq!(Ballot::single(order(&[3])).current_weight(), 1.0);
    }

    #[test]
    fn walks_the_preferences() {
        let mut b = Ballot::single(order(&[4, 2]));
        assert_eq!(b.current_candidate(), Some(CandidateId(4)));
        b.advance();
        assert_eq!(b.current_candidate(), Some(CandidateId(2)));
        b.advance();
        assert_eq!(b.current_candidate(), None);
        b.advance();
        assert_eq!(b.current_candidate(), None);
    }

    #[test]
    fn reserved_candidate_exhausts() {
        let mut b = Ballot::single(order(&[4, 0, 2]));
        b.advance();
        assert_eq!(b.current_candidate(), None);
        assert_eq!(Ballot::single(vec![]).current_candidate(), None);
    }

    #[test]
    fn transfer_factors_accumulate() {
        let mut b = Ballot::new(4.0, order(&[1, 2, 3]));
        b.apply_transfer_factor(0.5);
        b.apply_transfer_factor(0.25);
        assert_eq!(b.transfer_weight(), 0.125);
        assert_eq!(b.current_weight(), 0.5);
        assert_eq!(b.intrinsic_weight(), 4.0);
    }

    #[test]
    fn informal_preferences_make_no_ballot() {
        let prefs: HashMap<CandidateId, u32> =
            [(CandidateId(1), 1), (CandidateId(2), 1)].into_iter().collect();
        assert_eq!(Ballot::from_preferences(1.0, &prefs), None);

        let prefs: HashMap<CandidateId, u32> =
            [(CandidateId(1), 2), (CandidateId(2), 1)].into_iter().collect();
        let b = Ballot::from_preferences(1.0, &prefs).unwrap();
        assert_eq!(b.candidate_order(), order(&[2, 1]).as_slice());
    }
}
