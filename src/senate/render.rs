use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::senate::*;

/// Rounds to 3 decimals, without trailing zeros.
pub fn round_votes(votes: f64) -> String {
    let s = format!("{:.3}", votes);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Formats a number of votes for display: at most 3 decimals, thousands separated by commas.
pub fn format_votes(votes: f64) -> String {
    let rounded = round_votes(votes);
    let (sign, unsigned) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let (digits, frac) = match unsigned.split_once('.') {
        Some((d, f)) => (d, Some(f)),
        None => (unsigned, None),
    };

    let mut res = sign.to_string();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            res.push(',');
        }
        res.push(ch);
    }
    if let Some(f) = frac {
        res.push('.');
        res.push_str(f);
    }
    res
}

fn candidate_name(result: &CountResult, cid: CandidateId) -> String {
    result
        .candidate(cid)
        .map(|c| c.to_string())
        .unwrap_or_else(|| cid.to_string())
}

pub fn render_step(step: &CountStep, result: &CountResult) -> String {
    let mut res = format!("Count {}\n", step.number);
    match step.outcome {
        StepOutcome::InitialAllocation => {}
        StepOutcome::Excluded(cid) => {
            res.push_str(&format!(
                "\tCandidate Excluded = {}",
                candidate_name(result, cid)
            ));
        }
        StepOutcome::Elected(cid) => {
            res.push_str(&format!(
                "\tCandidate Elected = {}",
                candidate_name(result, cid)
            ));
        }
    }
    res.push('\n');
    for (cid, votes) in step.tally.sorted_descending() {
        res.push_str(&format!(
            "\t\t{} has {} votes\n",
            candidate_name(result, cid),
            format_votes(votes)
        ));
    }
    res
}

/// The full text report: every step of the count, then the elected candidates.
pub fn render_result(result: &CountResult) -> String {
    let mut res = String::new();
    for step in result.steps.iter() {
        res.push_str(&render_step(step, result));
        res.push('\n');
    }
    res.push_str("\nCandidates Elected:\n");
    for (idx, c) in result.elected.iter().enumerate() {
        res.push_str(&format!("  {}: {}\n", idx + 1, c));
    }
    res.push('\n');
    res
}

fn transfers_to_json(result: &CountResult, transfers: &TransferStats) -> JSMap<String, JSValue> {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    for (cid, weight) in transfers.transfers.iter() {
        res.insert(candidate_name(result, *cid), json!(round_votes(*weight)));
    }
    if transfers.exhausted > 0.0 {
        res.insert(
            "exhausted".to_string(),
            json!(round_votes(transfers.exhausted)),
        );
    }
    res
}

pub fn result_stats_to_json(result: &CountResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for step in result.steps.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (cid, votes) in step.tally.iter() {
            tally.insert(candidate_name(result, *cid), json!(round_votes(*votes)));
        }

        let transfers = transfers_to_json(result, &step.transfers);
        let tally_results: Vec<JSValue> = match step.outcome {
            StepOutcome::InitialAllocation => vec![],
            StepOutcome::Elected(cid) => vec![json!({
                "elected": candidate_name(result, cid),
                "transfers": transfers
            })],
            StepOutcome::Excluded(cid) => vec![json!({
                "excluded": candidate_name(result, cid),
                "transfers": transfers
            })],
        };

        l.push(json!({"round": step.number, "tally": tally, "tallyResults": tally_results}));
    }
    l
}

pub fn build_summary_js(
    config: &ElectionConfig,
    state: AustralianState,
    result: &CountResult,
) -> JSValue {
    let c = OutputConfig {
        contest: config.contest_name.clone(),
        date: config.contest_date.clone(),
        jurisdiction: config.contest_jurisdiction.clone(),
        state: state.code().to_string(),
        vacancies: result.vacancies,
        quota: result.quota.to_string(),
    };
    let elected: Vec<String> = result.elected.iter().map(|c| c.to_string()).collect();
    json!({
        "config": c,
        "elected": elected,
        "results": result_stats_to_json(result) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_result() -> CountResult {
        let candidates = vec![
            Candidate::new(1, "Alice", "Adams", "P1"),
            Candidate::new(2, "Bob", "Brown", "P2"),
        ];
        let ballots = vec![
            Ballot::single(vec![CandidateId(1)]),
            Ballot::single(vec![CandidateId(1)]),
            Ballot::single(vec![CandidateId(2)]),
        ];
        stv_count::run_count(1, &candidates, ballots).unwrap()
    }

    #[test]
    fn votes_formatting() {
        assert_eq!(format_votes(40.0), "40");
        assert_eq!(format_votes(0.0), "0");
        assert_eq!(format_votes(9.1234), "9.123");
        assert_eq!(format_votes(1234567.891), "1,234,567.891");
        assert_eq!(format_votes(999.9996), "1,000");
        assert_eq!(format_votes(-1234.5), "-1,234.5");
        assert_eq!(format_votes(123.0), "123");
        assert_eq!(round_votes(1234.25), "1234.25");
        assert_eq!(round_votes(-0.0001), "0");
    }

    #[test]
    fn text_report() {
        let expected = "Count 0\n\n\t\tAlice Adams has 2 votes\n\t\tBob Brown has 1 votes\n\n\
            Count 1\n\tCandidate Excluded = Bob Brown\n\t\tAlice Adams has 2 votes\n\n\
            Count 2\n\tCandidate Elected = Alice Adams\n\t\tAlice Adams has 2 votes\n\n\
            \nCandidates Elected:\n  1: Alice Adams\n\n";
        assert_eq!(render_result(&small_result()), expected);
    }

    #[test]
    fn json_summary() {
        let js = result_stats_to_json(&small_result());
        assert_eq!(js.len(), 3);
        assert_eq!(js[0]["tally"]["Bob Brown"], json!("1"));
        assert_eq!(js[0]["tallyResults"], json!([]));
        assert_eq!(
            js[1]["tallyResults"],
            json!([{"excluded": "Bob Brown", "transfers": {"exhausted": "1"}}])
        );
        assert_eq!(
            js[2]["tallyResults"],
            json!([{"elected": "Alice Adams", "transfers": {}}])
        );
    }
}
