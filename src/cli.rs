use std::{fmt, path::PathBuf, str::FromStr};

use clap::Parser;

/// Fetch PubMed papers that have at least one author from a non-academic institution.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Search query, using PubMed's full query syntax
    #[arg(value_name = "QUERY")]
    pub query: Query,

    /// Print raw endpoint responses and debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Write the results as CSV to this file instead of printing a table
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A free-text search term, passed to the search endpoint untouched.
///
/// The only thing checked here is that there is something to search for.
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Query {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("query must not be empty".to_string());
        }
        Ok(Query(s.to_string()))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
