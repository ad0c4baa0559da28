use ureq::Agent;
use url::Url;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!(
    "pubmed-fetcher/",
    env!("CARGO_PKG_VERSION"),
    " (+https://www.ncbi.nlm.nih.gov/books/NBK25501/)"
);

// A full 50-article efetch response can run past ureq's default 10 MiB body cap.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Blocking agent shared by both endpoints.
///
/// Non-2xx statuses come back as ordinary responses so callers can report them as
/// [`Error::Status`]. No timeout is configured.
pub fn agent() -> Agent {
    let config = Agent::config_builder().http_status_as_error(false).build();
    Agent::new_with_config(config)
}

/// A response whose body has been read but whose status has not been judged yet.
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body, or [`Error::Status`] if the endpoint did not answer with 2xx.
    pub fn into_success(self, endpoint: &Url) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::Status {
                endpoint: endpoint.to_string(),
                status: self.status,
            })
        }
    }
}

/// GET `endpoint` with `params` appended to its query string.
pub fn get(agent: &Agent, endpoint: &Url, params: &[(&str, &str)]) -> Result<Reply> {
    let request = params
        .iter()
        .fold(agent.get(endpoint.as_str()), |req, (k, v)| req.query(*k, *v))
        .header("User-Agent", USER_AGENT);

    log::debug!("GET {endpoint} {params:?}");
    let response = request
        .call()
        .map_err(|e| Error::transport(endpoint, e))?;
    let status = response.status().as_u16();
    let body = response
        .into_body()
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_string()
        .map_err(|e| Error::transport(endpoint, e))?;
    log::debug!("{endpoint} answered HTTP {status} with {} bytes", body.len());

    Ok(Reply { status, body })
}
