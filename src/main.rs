mod args;
mod senate;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use crate::args::Args;
use crate::senate::CountRequest;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    } else {
        env_logger::init();
    }
    debug!("args: {:?}", args);

    let request = CountRequest {
        config_path: args.config,
        mode: args.mode,
        vacancies: args.vacancies,
        out: args.out,
        reference: args.reference,
    };

    if let Err(e) = senate::run_count(&request) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
