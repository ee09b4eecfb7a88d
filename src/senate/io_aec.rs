// Readers for the files published by the Australian Electoral Commission.

use std::collections::HashMap;

use crate::senate::io_common::{read_lines, simplify_file_name};
use crate::senate::*;

const TAB: u8 = b'\t';
const COMMA: u8 = b',';

/// A group voting ticket, as read from the tickets file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTicket {
    pub group: String,
    pub ticket: u32,
    pub preferences: HashMap<CandidateId, u32>,
}

/// Reads the candidates standing in the given state.
///
/// Columns: state, party id, party name, candidate id, surname, given names.
pub fn read_candidates(path: &str, state: AustralianState) -> SenateResult<Vec<Candidate>> {
    info!("Reading candidates from {:?}", simplify_file_name(path));
    let mut res: Vec<Candidate> = Vec::new();
    for line_r in read_lines(path, TAB)? {
        let line = line_r?;
        if line.get(0)? != state.code() {
            continue;
        }
        let c = Candidate::new(line.get_u32(3)?, line.get(5)?, line.get(4)?, line.get(1)?);
        debug!("read_candidates: {}: {:?}", line.lineno, c);
        res.push(c);
    }
    info!("Read {} candidates for {}", res.len(), state);
    Ok(res)
}

/// Reads the group voting tickets lodged in the given state.
///
/// Every line holds one preference of one ticket: state (0), owner group (3), ticket (4),
/// candidate id (5), owner party (10), preference (12). Tickets are returned in the order in
/// which they first appear.
pub fn read_group_voting_tickets(
    path: &str,
    state: AustralianState,
) -> SenateResult<Vec<ParsedTicket>> {
    info!("Reading group voting tickets from {:?}", simplify_file_name(path));
    let mut res: Vec<ParsedTicket> = Vec::new();
    let mut positions: HashMap<(String, u32), usize> = HashMap::new();
    for line_r in read_lines(path, TAB)? {
        let line = line_r?;
        if line.get(0)? != state.code() {
            continue;
        }
        let group = line.get(3)?.to_string();
        let ticket = line.get_u32(4)?;
        let cid = CandidateId(line.get_u32(5)?);
        let preference = line.get_u32(12)?;
        if preference == 1 {
            debug!(
                "read_group_voting_tickets: group {} ticket {} owned by {}",
                group,
                ticket,
                line.get(10)?
            );
        }

        let idx = *positions
            .entry((group.clone(), ticket))
            .or_insert_with(|| {
                res.push(ParsedTicket {
                    group,
                    ticket,
                    preferences: HashMap::new(),
                });
                res.len() - 1
            });
        res[idx].preferences.insert(cid, preference);
    }
    info!("Read {} group voting tickets for {}", res.len(), state);
    Ok(res)
}

/// Reads the above the line votes of each group in the given state.
///
/// Columns: state (0), group (1), votes (4).
pub fn read_group_first_preferences(
    path: &str,
    state: AustralianState,
) -> SenateResult<Vec<(String, f64)>> {
    info!(
        "Reading first preferences by group from {:?}",
        simplify_file_name(path)
    );
    let mut res: Vec<(String, f64)> = Vec::new();
    for line_r in read_lines(path, TAB)? {
        let line = line_r?;
        if line.get(0)? != state.code() {
            continue;
        }
        res.push((line.get(1)?.to_string(), line.get_f64(4)?));
    }
    debug!("read_group_first_preferences: {:?}", res);
    Ok(res)
}

/// Reads the below the line preferences of a state.
///
/// The file is comma separated, one line per preference: candidate id (0), preference (1),
/// batch (2), paper (3). All the lines of the same paper make one ballot. Blank preferences
/// are skipped.
pub fn read_btl_preferences(path: &str) -> SenateResult<Vec<HashMap<CandidateId, u32>>> {
    info!(
        "Reading below the line preferences from {:?}",
        simplify_file_name(path)
    );
    let mut res: Vec<HashMap<CandidateId, u32>> = Vec::new();
    let mut positions: HashMap<(u32, u32), usize> = HashMap::new();
    let mut num_blanks: usize = 0;
    for line_r in read_lines(path, COMMA)? {
        let line = line_r?;
        let batch = line.get_u32(2)?;
        let paper = line.get_u32(3)?;
        let cid = CandidateId(line.get_u32(0)?);

        let idx = *positions.entry((batch, paper)).or_insert_with(|| {
            res.push(HashMap::new());
            res.len() - 1
        });
        match line.get_optional_u32(1)? {
            Some(preference) => {
                res[idx].insert(cid, preference);
            }
            None => num_blanks += 1,
        }
    }
    info!(
        "Read {} below the line ballots ({} blank preferences)",
        res.len(),
        num_blanks
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_file(name: &str) -> String {
        format!(
            "{}/tests/data/tas_small/{}",
            env!("CARGO_MANIFEST_DIR"),
            name
        )
    }

    #[test]
    fn candidates_of_one_state() {
        let cands = read_candidates(&data_file("candidates.txt"), AustralianState::TAS).unwrap();
        let ids: Vec<u32> = cands.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![101, 102, 201, 202, 301]);
        assert_eq!(cands[0], Candidate::new(101, "Anne", "SMITH", "ALP"));

        let vic = read_candidates(&data_file("candidates.txt"), AustralianState::VIC).unwrap();
        assert_eq!(vic.len(), 1);
    }

    #[test]
    fn tickets_are_grouped() {
        let tickets =
            read_group_voting_tickets(&data_file("gvt.txt"), AustralianState::TAS).unwrap();
        let keys: Vec<(&str, u32)> = tickets
            .iter()
            .map(|t| (t.group.as_str(), t.ticket))
            .collect();
        assert_eq!(keys, vec![("A", 1), ("B", 1), ("B", 2), ("C", 1)]);
        assert_eq!(tickets[0].preferences.len(), 5);
        assert_eq!(tickets[2].preferences.get(&CandidateId(301)), Some(&3));
    }

    #[test]
    fn group_votes() {
        let votes =
            read_group_first_preferences(&data_file("first_preferences.txt"), AustralianState::TAS)
                .unwrap();
        assert_eq!(
            votes,
            vec![
                ("A".to_string(), 40.0),
                ("B".to_string(), 30.0),
                ("C".to_string(), 15.0)
            ]
        );
    }

    #[test]
    fn papers_make_ballots() {
        let ballots = read_btl_preferences(&data_file("btl.csv")).unwrap();
        assert_eq!(ballots.len(), 4);
        assert_eq!(ballots[0].len(), 3);
        assert_eq!(ballots[0].get(&CandidateId(301)), Some(&1));
        // The blank preference of the second paper is not kept.
        assert_eq!(ballots[1].len(), 2);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_btl_preferences(&data_file("nothing.csv")),
            Err(SenateError::CsvOpen { .. })
        ));
    }
}
