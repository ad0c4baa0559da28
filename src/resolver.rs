use serde_json::Value;
use ureq::Agent;
use url::Url;

use crate::cli::Query;
use crate::error::{Error, Result};
use crate::http;

/// Upper bound on identifiers requested per search. There is no pagination past it.
pub const MAX_RESULTS: usize = 50;

/// Turns a free-text query into PubMed identifiers via the `esearch` endpoint.
pub struct Resolver {
    agent: Agent,
    endpoint: Url,
}

impl Resolver {
    pub fn new(agent: Agent, endpoint: Url) -> Self {
        Self { agent, endpoint }
    }

    /// Identifiers matching `query`, in the order the endpoint ranked them.
    ///
    /// An empty list is a normal answer, not an error.
    pub fn resolve(&self, query: &Query) -> Result<Vec<String>> {
        let retmax = MAX_RESULTS.to_string();
        let reply = http::get(
            &self.agent,
            &self.endpoint,
            &[
                ("db", "pubmed"),
                ("term", query.as_str()),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
            ],
        )?;
        log::debug!("search response: {}", reply.body);

        let body = reply.into_success(&self.endpoint)?;
        let ids = parse_id_list(&body)?;
        log::info!("{} identifier(s) for {:?}", ids.len(), query.as_str());
        Ok(ids)
    }
}

/// Read `esearchresult.idlist`; a missing list means no hits.
pub fn parse_id_list(body: &str) -> Result<Vec<String>> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| Error::Malformed(format!("search response is not JSON: {e}")))?;

    let Some(list) = json.get("esearchresult").and_then(|r| r.get("idlist")) else {
        return Ok(Vec::new());
    };
    let Some(list) = list.as_array() else {
        return Err(Error::Malformed("esearchresult.idlist is not a list".into()));
    };

    list.iter()
        .map(|id| match id {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(Error::Malformed(format!("unexpected identifier {other}"))),
        })
        .collect()
}
