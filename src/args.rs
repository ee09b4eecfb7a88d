use clap::Parser;

/// Counts a senate election from the published preference data, using a single transferable
/// vote procedure.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON description of the election. The data files it mentions are
    /// resolved relative to its directory.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (standard or belowTheLineOnly, optional) How the ballots are assembled. Overrides the
    /// count mode of the election description.
    #[clap(short, long, value_parser)]
    pub mode: Option<String>,

    /// (number, optional) The number of seats to fill. Overrides the election description and
    /// the normal half-senate vacancies of the state.
    #[clap(long, value_parser)]
    pub vacancies: Option<u32>,

    /// (file path, 'stdout' or empty) If specified, the summary of the count will be written in
    /// JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of a count in JSON format. If
    /// provided, hsenate will check that its summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
