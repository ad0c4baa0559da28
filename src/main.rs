use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;

use crate::{
    cli::Cli,
    config::Config,
    error::ErrorKind,
    pipeline::{Outcome, Pipeline},
};

mod affiliation;
mod cli;
mod config;
mod error;
mod fetcher;
mod http;
mod logging;
mod parser;
mod pipeline;
mod record;
mod report;
mod resolver;

fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init_logging(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().context("endpoint configuration")?;
    if let Some(summary) = &config.summary_url {
        log::debug!("summary endpoint {summary} is configured but not used");
    }

    let mut pipeline = Pipeline::new(&config);
    if !args.debug && std::io::stderr().is_terminal() {
        pipeline = pipeline.with_spinner();
    }

    let records = match pipeline.run(&args.query)? {
        Outcome::NoResults => {
            println!("No papers found.");
            return Ok(());
        }
        Outcome::Records(records) => records,
    };

    match args.file {
        Some(path) => {
            report::write_csv(&records, &path)?;
            println!("Results saved to {}", path.display());
        }
        None => report::print_table(&records),
    }
    Ok(())
}

fn print_error(err: &anyhow::Error) {
    let colour = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    if colour {
        eprintln!("{} {err:#}", "error:".red().bold());
    } else {
        eprintln!("error: {err:#}");
    }

    let hint = match err.downcast_ref::<error::Error>().map(error::Error::kind) {
        Some(ErrorKind::Config) => Some(format!(
            "set {} and {} in the environment or in a .env file",
            config::SEARCH_URL_VAR,
            config::FETCH_URL_VAR
        )),
        Some(ErrorKind::Network) => Some("the endpoint may be down or rate limiting".to_string()),
        _ => None,
    };
    if let Some(hint) = hint {
        if colour {
            eprintln!("{} {hint}", "hint:".yellow());
        } else {
            eprintln!("hint: {hint}");
        }
    }
}
