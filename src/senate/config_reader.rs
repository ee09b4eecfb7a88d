use crate::senate::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::fmt::Display;
use std::path::Path;

/// The description of an election to count.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    /// The code of the state or territory, for example `TAS`.
    pub state: String,
    pub vacancies: Option<u32>,
    #[serde(rename = "countMode")]
    pub count_mode: Option<String>,
    #[serde(rename = "dataSources")]
    pub data_sources: DataSources,
}

/// The data files published by the electoral commission, relative to the election description.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSources {
    #[serde(rename = "candidatesFile")]
    pub candidates_file: String,
    #[serde(rename = "groupVotingTicketsFile")]
    pub group_voting_tickets_file: String,
    #[serde(rename = "firstPreferencesByGroupFile")]
    pub first_preferences_file: String,
    #[serde(rename = "btlPreferencesFile")]
    pub btl_preferences_file: Option<String>,
}

impl DataSources {
    pub fn candidates_path(&self, root: &Path) -> String {
        resolve(root, &self.candidates_file)
    }

    pub fn group_voting_tickets_path(&self, root: &Path) -> String {
        resolve(root, &self.group_voting_tickets_file)
    }

    pub fn first_preferences_path(&self, root: &Path) -> String {
        resolve(root, &self.first_preferences_file)
    }

    pub fn btl_preferences_path(&self, root: &Path) -> Option<String> {
        self.btl_preferences_file.as_ref().map(|f| resolve(root, f))
    }
}

fn resolve(root: &Path, file: &str) -> String {
    root.join(file).display().to_string()
}

/// The header of the JSON summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub state: String,
    pub vacancies: u32,
    pub quota: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AustralianState {
    ACT,
    NSW,
    NT,
    QLD,
    SA,
    TAS,
    VIC,
    WA,
}

impl AustralianState {
    pub const ALL: [AustralianState; 8] = [
        AustralianState::ACT,
        AustralianState::NSW,
        AustralianState::NT,
        AustralianState::QLD,
        AustralianState::SA,
        AustralianState::TAS,
        AustralianState::VIC,
        AustralianState::WA,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AustralianState::ACT => "ACT",
            AustralianState::NSW => "NSW",
            AustralianState::NT => "NT",
            AustralianState::QLD => "QLD",
            AustralianState::SA => "SA",
            AustralianState::TAS => "TAS",
            AustralianState::VIC => "VIC",
            AustralianState::WA => "WA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AustralianState::ACT => "Australian Capital Territory",
            AustralianState::NSW => "New South Wales",
            AustralianState::NT => "Northern Territory",
            AustralianState::QLD => "Queensland",
            AustralianState::SA => "South Australia",
            AustralianState::TAS => "Tasmania",
            AustralianState::VIC => "Victoria",
            AustralianState::WA => "Western Australia",
        }
    }

    /// The seats contested at a half-senate election.
    pub fn normal_vacancies(&self) -> u32 {
        match self {
            AustralianState::ACT | AustralianState::NT => 2,
            _ => 6,
        }
    }

    pub fn from_code(code: &str) -> Option<AustralianState> {
        AustralianState::ALL
            .iter()
            .find(|s| s.code().eq_ignore_ascii_case(code.trim()))
            .cloned()
    }
}

impl Display for AustralianState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub fn parse_count_mode(mode: &str) -> SenateResult<CollectionMode> {
    match mode {
        "standard" => Ok(CollectionMode::Standard),
        "belowTheLineOnly" | "btlOnly" => Ok(CollectionMode::BelowTheLineOnly),
        x => whatever!(
            "Unknown count mode {:?}: expected standard or belowTheLineOnly",
            x
        ),
    }
}

pub fn read_election_config(path: &str) -> SenateResult<ElectionConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ElectionConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> SenateResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
