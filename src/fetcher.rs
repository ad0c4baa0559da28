use ureq::Agent;
use url::Url;

use crate::error::Result;
use crate::http;
use crate::parser::parse_records;
use crate::record::Record;

/// How much of the raw `efetch` body to show in debug output.
const DEBUG_PREVIEW_CHARS: usize = 500;

/// Pulls full article records for a batch of identifiers via the `efetch` endpoint.
pub struct Fetcher {
    agent: Agent,
    endpoint: Url,
}

impl Fetcher {
    pub fn new(agent: Agent, endpoint: Url) -> Self {
        Self { agent, endpoint }
    }

    /// Fetch all `ids` in one request and keep the articles with non-academic authors.
    pub fn fetch(&self, ids: &[String]) -> Result<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let body = http::get(
            &self.agent,
            &self.endpoint,
            &[("db", "pubmed"), ("id", joined.as_str()), ("retmode", "xml")],
        )?
        .into_success(&self.endpoint)?;

        if log::log_enabled!(log::Level::Debug) {
            let preview: String = body.chars().take(DEBUG_PREVIEW_CHARS).collect();
            log::debug!("fetched paper details: {preview}");
        }

        parse_records(&body)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::error::{Error, ErrorKind};

    const TWO_ARTICLES: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">111</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><Year>2024</Year></PubDate></JournalIssue></Journal>
        <ArticleTitle>Antibody engineering at scale.</ArticleTitle>
        <AuthorList>
          <Author><LastName>Smith</LastName><AffiliationInfo><Affiliation>Genentech Inc.</Affiliation></AffiliationInfo></Author>
          <Author><LastName>Doe</LastName><AffiliationInfo><Affiliation>Harvard University</Affiliation></AffiliationInfo></Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">222</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><Year>2023</Year></PubDate></JournalIssue></Journal>
        <ArticleTitle>Campus only.</ArticleTitle>
        <AuthorList>
          <Author><LastName>Roe</LastName><AffiliationInfo><Affiliation>Yale School of Medicine</Affiliation></AffiliationInfo></Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    fn endpoint(server: &Server) -> Url {
        Url::parse(&format!("{}/efetch.fcgi", server.url())).unwrap()
    }

    #[test]
    fn no_ids_means_no_request() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .expect(0)
            .create();

        let fetcher = Fetcher::new(http::agent(), endpoint(&server));
        assert!(fetcher.fetch(&[]).unwrap().is_empty());
        mock.assert();
    }

    #[test]
    fn fetches_the_batch_in_one_request() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("db".into(), "pubmed".into()),
                Matcher::UrlEncoded("id".into(), "111,222".into()),
                Matcher::UrlEncoded("retmode".into(), "xml".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(TWO_ARTICLES)
            .expect(1)
            .create();

        let fetcher = Fetcher::new(http::agent(), endpoint(&server));
        let records = fetcher
            .fetch(&["111".to_string(), "222".to_string()])
            .unwrap();
        mock.assert();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pmid, "111");
        assert_eq!(records[0].author_names(), "Smith");
        assert_eq!(records[0].affiliations(), "Genentech Inc.");
    }

    #[test]
    fn server_error_aborts_the_batch() {
        let mut server = Server::new();
        server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        let err = Fetcher::new(http::agent(), endpoint(&server))
            .fetch(&["111".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(matches!(err, Error::Status { status: 500, .. }));
    }

    #[test]
    fn truncated_xml_aborts_the_batch() {
        let mut server = Server::new();
        server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(&TWO_ARTICLES[..TWO_ARTICLES.find("<AuthorList>").unwrap()])
            .create();

        let err = Fetcher::new(http::agent(), endpoint(&server))
            .fetch(&["111".to_string(), "222".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn non_xml_success_body_aborts_the_batch() {
        for body in [
            "Service temporarily unavailable",
            r#"{"error":"API rate limit exceeded","api-key":"none"}"#,
        ] {
            let mut server = Server::new();
            server
                .mock("GET", "/efetch.fcgi")
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(body)
                .create();

            let err = Fetcher::new(http::agent(), endpoint(&server))
                .fetch(&["111".to_string()])
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse, "body: {body}");
        }
    }

    #[test]
    fn body_cut_between_articles_aborts_the_batch() {
        let cut = TWO_ARTICLES.find("</PubmedArticle>").unwrap() + "</PubmedArticle>".len();
        let mut server = Server::new();
        server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(&TWO_ARTICLES[..cut])
            .create();

        let err = Fetcher::new(http::agent(), endpoint(&server))
            .fetch(&["111".to_string(), "222".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
