use log::debug;
use std::collections::{BTreeMap, HashMap};

use crate::config::CandidateId;

/// Converts the preferences marked on a ballot into an ordering of the candidates.
///
/// The mapping from candidates to preference numbers is not necessarily one-to-one in the
/// source data. A ballot giving the same preference number to two candidates is informal
/// and yields None. Missing preference numbers are skipped: preferences {1, 3} produce
/// two candidates.
///
/// Formality rules beyond duplicated preferences are not checked.
pub fn candidate_order_from_preferences(
    preferences: &HashMap<CandidateId, u32>,
) -> Option<Vec<CandidateId>> {
    // Sorted by preference number, so that walking it skips the gaps.
    let mut by_preference: BTreeMap<u32, CandidateId> = BTreeMap::new();

    for (cid, pref) in preferences.iter() {
        if let Some(other) = by_preference.insert(*pref, *cid) {
            debug!(
                "candidate_order_from_preferences: preference {} given to both {} and {}",
                pref, other, cid
            );
            return None;
        }
    }

    Some(by_preference.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(entries: &[(u32, u32)]) -> HashMap<CandidateId, u32> {
        entries
            .iter()
            .map(|(cid, pref)| (CandidateId(*cid), *pref))
            .collect()
    }

    fn ids(v: &[u32]) -> Vec<CandidateId> {
        v.iter().map(|x| CandidateId(*x)).collect()
    }

    #[test]
    fn orders_by_preference() {
        let order = candidate_order_from_preferences(&prefs(&[(30, 3), (10, 1), (20, 2)]));
        assert_eq!(order, Some(ids(&[10, 20, 30])));
    }

    #[test]
    fn gaps_are_skipped() {
        let order = candidate_order_from_preferences(&prefs(&[(7, 1), (9, 3)]));
        assert_eq!(order, Some(ids(&[7, 9])));
    }

    #[test]
    fn duplicated_preference_is_informal() {
        let order = candidate_order_from_preferences(&prefs(&[(7, 1), (8, 2), (9, 2)]));
        assert_eq!(order, None);
    }

    #[test]
    fn preference_zero_comes_first() {
        let order = candidate_order_from_preferences(&prefs(&[(7, 1), (8, 0)]));
        assert_eq!(order, Some(ids(&[8, 7])));
    }

    #[test]
    fn empty_preferences_give_empty_order() {
        assert_eq!(candidate_order_from_preferences(&HashMap::new()), Some(vec![]));
    }
}
