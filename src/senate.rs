use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use stv_count::collector::{BallotCollector, CollectionMode};
use stv_count::*;

use std::fs;
use std::path::Path;

use text_diff::print_diff;

use crate::senate::config_reader::*;
use crate::senate::io_aec::*;
use crate::senate::render::*;

pub mod config_reader;
mod io_aec;
mod io_common;
mod render;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SenateError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The election description has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Unknown state or territory {code}"))]
    UnknownState { code: String },
    #[snafu(display("Error opening data file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} has no column {column}"))]
    CsvLineTooShort {
        path: String,
        lineno: usize,
        column: usize,
    },
    #[snafu(display("Line {lineno} of {path}: {value:?} is not a number"))]
    CsvNumber {
        path: String,
        lineno: usize,
        value: String,
    },
    #[snafu(display("The count could not be completed"))]
    Counting { source: CountError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SenateResult<T> = Result<T, SenateError>;

/// Everything needed to run a count from the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CountRequest {
    pub config_path: String,
    pub mode: Option<String>,
    pub vacancies: Option<u32>,
    pub out: Option<String>,
    pub reference: Option<String>,
}

/// Loads the election described by the configuration, counts it and prints the result.
pub fn run_count(request: &CountRequest) -> SenateResult<CountResult> {
    let config_p = Path::new(request.config_path.as_str());
    let config = read_election_config(&request.config_path)?;
    info!("config: {:?}", config);

    let state = AustralianState::from_code(&config.state).context(UnknownStateSnafu {
        code: config.state.clone(),
    })?;
    let vacancies = request
        .vacancies
        .or(config.vacancies)
        .unwrap_or_else(|| state.normal_vacancies());
    let mode = match request.mode.as_ref().or(config.count_mode.as_ref()) {
        Some(m) => parse_count_mode(m)?,
        None => CollectionMode::Standard,
    };
    info!(
        "Counting {} ({}) for {} vacancies, mode: {:?}",
        state.name(),
        state.code(),
        vacancies,
        mode
    );

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let collector = load_ballots(root_p, &config.data_sources, state)?;
    let collected = collector.collect(mode);

    let result = stv_count::run_count(vacancies, &collected.candidates, collected.ballots)
        .context(CountingSnafu {})?;

    print!("{}", render_result(&result));

    let result_js = build_summary_js(&config, state, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match request.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) if !path.is_empty() => {
            fs::write(path, pretty_js_stats.as_bytes())
                .context(WritingSummarySnafu { path })?;
            info!("Summary written to {}", path);
        }
        _ => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = request.reference.as_ref() {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result)
}

fn load_ballots(
    root_p: &Path,
    sources: &DataSources,
    state: AustralianState,
) -> SenateResult<BallotCollector> {
    let candidates = read_candidates(&sources.candidates_path(root_p), state)?;
    let mut collector = BallotCollector::new().candidates(&candidates);

    for ticket in read_group_voting_tickets(&sources.group_voting_tickets_path(root_p), state)? {
        collector.add_group_ticket(&ticket.group, ticket.ticket, ticket.preferences);
    }

    for (group, votes) in read_group_first_preferences(&sources.first_preferences_path(root_p), state)? {
        collector.set_group_votes(&group, votes);
    }

    if let Some(p) = sources.btl_preferences_path(root_p) {
        for preferences in read_btl_preferences(&p)? {
            collector.add_btl_ballot(preferences);
        }
    }
    Ok(collector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        format!(
            "{}/tests/data/{}/config.json",
            env!("CARGO_MANIFEST_DIR"),
            name
        )
    }

    fn request(name: &str) -> CountRequest {
        CountRequest {
            config_path: fixture(name),
            ..CountRequest::default()
        }
    }

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("hsenate-{}-{}.json", std::process::id(), name))
            .display()
            .to_string()
    }

    fn elected_names(result: &CountResult) -> Vec<String> {
        result.elected.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn counts_the_standard_way() {
        let result = run_count(&request("tas_small")).unwrap();
        assert_eq!(result.quota, 30);
        assert_eq!(elected_names(&result), vec!["Anne SMITH", "Carol BROWN"]);
        // The candidate from another state never takes part.
        assert!(result.candidate(CandidateId(999)).is_none());
        assert_eq!(result.steps.len(), 4);
    }

    #[test]
    fn counts_below_the_line_only() {
        let req = CountRequest {
            mode: Some("belowTheLineOnly".to_string()),
            ..request("tas_small")
        };
        let result = run_count(&req).unwrap();
        assert_eq!(result.quota, 7);
        assert_eq!(elected_names(&result), vec!["Eve WHITE", "Bob JONES"]);
    }

    #[test]
    fn vacancies_can_be_overridden() {
        let req = CountRequest {
            vacancies: Some(1),
            ..request("tas_small")
        };
        let result = run_count(&req).unwrap();
        assert_eq!(result.quota, 45);
        assert_eq!(elected_names(&result), vec!["Anne SMITH"]);
    }

    #[test]
    fn summary_matches_itself_as_reference() {
        let out = temp_path("summary");
        let req = CountRequest {
            out: Some(out.clone()),
            ..request("tas_small")
        };
        run_count(&req).unwrap();

        let check = CountRequest {
            reference: Some(out.clone()),
            ..request("tas_small")
        };
        assert!(run_count(&check).is_ok());

        // A different count does not match.
        let other = CountRequest {
            mode: Some("belowTheLineOnly".to_string()),
            reference: Some(out.clone()),
            ..request("tas_small")
        };
        assert!(matches!(
            run_count(&other),
            Err(SenateError::Whatever { .. })
        ));
        let _ = fs::remove_file(out);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let req = CountRequest {
            mode: Some("proportional".to_string()),
            ..request("tas_small")
        };
        assert!(matches!(run_count(&req), Err(SenateError::Whatever { .. })));
    }

    #[test]
    fn missing_configuration() {
        assert!(matches!(
            run_count(&request("does_not_exist")),
            Err(SenateError::OpeningJson { .. })
        ));
    }

    #[test]
    fn too_many_vacancies_fail_the_count() {
        let req = CountRequest {
            vacancies: Some(12),
            ..request("tas_small")
        };
        assert!(matches!(
            run_count(&req),
            Err(SenateError::Counting {
                source: CountError::TooFewCandidates { .. }
            })
        ));
    }
}
