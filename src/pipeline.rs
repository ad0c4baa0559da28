use std::time::Duration;

use indicatif::ProgressBar;

use crate::cli::Query;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::http;
use crate::record::Record;
use crate::resolver::Resolver;

/// How a run ended when nothing went wrong.
#[derive(Debug)]
pub enum Outcome {
    /// The search matched nothing; the fetch endpoint was never contacted.
    NoResults,
    /// Articles with at least one non-academic author. May be empty when every match was academic.
    Records(Vec<Record>),
}

/// Search, then fetch and filter. Each stage blocks until its request completes.
pub struct Pipeline {
    resolver: Resolver,
    fetcher: Fetcher,
    progress: ProgressBar,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        let agent = http::agent();
        Self {
            resolver: Resolver::new(agent.clone(), config.search_url.clone()),
            fetcher: Fetcher::new(agent, config.fetch_url.clone()),
            progress: ProgressBar::hidden(),
        }
    }

    /// Show a spinner on stderr while requests are in flight.
    pub fn with_spinner(mut self) -> Self {
        self.progress = ProgressBar::new_spinner();
        self
    }

    pub fn run(&self, query: &Query) -> Result<Outcome> {
        self.progress.enable_steady_tick(Duration::from_millis(100));
        let outcome = self.stages(query);
        self.progress.finish_and_clear();
        outcome
    }

    fn stages(&self, query: &Query) -> Result<Outcome> {
        self.progress.set_message(format!("searching PubMed for \"{query}\""));
        let ids = self.resolver.resolve(query)?;
        if ids.is_empty() {
            return Ok(Outcome::NoResults);
        }

        self.progress
            .set_message(format!("fetching {} article(s)", ids.len()));
        let records = self.fetcher.fetch(&ids)?;
        for rec in &records {
            log::debug!(
                "{}: {} non-academic author(s)",
                rec.pmid,
                rec.authors().len()
            );
        }
        log::info!(
            "{} of {} article(s) have non-academic authors",
            records.len(),
            ids.len()
        );
        Ok(Outcome::Records(records))
    }
}
