/*!
Counting engine for multi-seat senate elections using the single transferable vote.

The count follows a simplified Australian Senate procedure:
- the quota is computed once, from the total weight of all the ballots
- at each step, the candidate with the most votes is elected if they exceed the quota, and
  the surplus is transferred at a reduced value
- otherwise the candidate with the fewest votes is excluded and their ballots are
  transferred in full
- when a single continuing candidate remains, they take the last vacancy

Ties are broken by candidate order (family name, given names, party, identifier).

```
use stv_count::{run_count, Ballot, Candidate, CandidateId};

let candidates = vec![
    Candidate::new(1, "Alice", "Adams", "P1"),
    Candidate::new(2, "Bob", "Brown", "P2"),
];
let ballots = vec![
    Ballot::single(vec![CandidateId(1), CandidateId(2)]),
    Ballot::single(vec![CandidateId(1)]),
    Ballot::single(vec![CandidateId(2)]),
];
let result = run_count(1, &candidates, ballots)?;
assert_eq!(result.elected, vec![candidates[0].clone()]);
# Ok::<(), stv_count::CountError>(())
```

See the [manual] for more details.
*/

mod ballot;
pub mod collector;
mod config;
mod counter;
pub mod manual;
mod preferences;
mod tally;

use log::info;

pub use crate::ballot::Ballot;
pub use crate::config::*;
pub use crate::counter::{compute_quota, BallotCounter};
pub use crate::preferences::candidate_order_from_preferences;
pub use crate::tally::VoteTally;

/// Runs a complete count.
///
/// Arguments:
/// * `vacancies` the number of seats to fill
/// * `candidates` the candidates taking part in the count, in any order
/// * `ballots` the ballots, consumed by the count
pub fn run_count(
    vacancies: u32,
    candidates: &[Candidate],
    ballots: Vec<Ballot>,
) -> Result<CountResult, CountError> {
    let mut counter = BallotCounter::new(vacancies, candidates, ballots)?;
    let res = counter.run()?;
    info!(
        "Count complete after {} steps, elected: {:?}",
        res.steps.len() - 1,
        res.elected
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
    );
    Ok(res)
}
