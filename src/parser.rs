//! PubMed `efetch` XML extraction.
//!
//! Walks the document once with quick-xml, collecting the handful of fields the report needs
//! from each `PubmedArticle`, and applies the academic-affiliation filter on the way.

use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

use crate::affiliation::is_academic;
use crate::error::{Error, Result};
use crate::record::{Contributor, Record};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// First email address anywhere in `text`.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Extract every article with at least one non-academic author.
///
/// The corresponding email is the first address found in the whole response, so in a
/// multi-article batch every record carries the same one.
pub fn parse_records(xml: &str) -> Result<Vec<Record>> {
    let email = find_email(xml);

    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut seen = 0usize;
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    open_root(&mut root_seen)?;
                }
                if e.name().as_ref() == b"PubmedArticle" {
                    seen += 1;
                    let article = parse_article(&mut reader)?;
                    if let Some(rec) = article.into_record(email.clone())? {
                        records.push(rec);
                    }
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(_)) if depth == 0 => open_root(&mut root_seen)?,
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::Malformed("closing tag without an open element".into()))?;
            }
            Ok(Event::Text(t)) if depth == 0 => {
                if !String::from_utf8_lossy(t.as_ref()).trim().is_empty() {
                    return Err(Error::Malformed(
                        "text outside the root element; the body is not XML".into(),
                    ));
                }
            }
            Ok(Event::CData(_) | Event::GeneralRef(_)) if depth == 0 => {
                return Err(Error::Malformed("content outside the root element".into()));
            }
            Ok(Event::Eof) => {
                if depth > 0 {
                    return Err(Error::Malformed(
                        "document ended before its root element was closed".into(),
                    ));
                }
                if !root_seen {
                    return Err(Error::Malformed("document has no root element".into()));
                }
                break;
            }
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "parsed {seen} article(s), {} with non-academic authors",
        records.len()
    );
    Ok(records)
}

#[derive(Debug, Default)]
struct AuthorFields {
    last_name: Option<String>,
    affiliation: Option<String>,
}

#[derive(Debug, Default)]
struct ArticleFields {
    pmid: Option<String>,
    title: Option<String>,
    year: Option<String>,
    authors: Vec<AuthorFields>,
}

impl ArticleFields {
    fn into_record(self, email: Option<String>) -> Result<Option<Record>> {
        let pmid = self
            .pmid
            .ok_or_else(|| Error::Malformed("PubmedArticle without PMID".to_string()))?;
        let title = self.title.ok_or_else(|| {
            Error::Malformed(format!("PubmedArticle {pmid} without ArticleTitle"))
        })?;

        let mut kept = Vec::new();
        for author in self.authors {
            // Authors without a last name (collective names) are not considered at all.
            // The report names authors by `LastName` alone.
            let Some(name) = author.last_name else {
                continue;
            };
            let Some(affiliation) = author.affiliation else {
                continue;
            };
            if is_academic(&affiliation) {
                log::trace!("{pmid}: dropping academic author {name} ({affiliation})");
                continue;
            }
            kept.push(Contributor { name, affiliation });
        }

        Ok(Record::new(pmid, title, self.year, kept, email))
    }
}

/// A document has exactly one root element.
fn open_root(root_seen: &mut bool) -> Result<()> {
    if std::mem::replace(root_seen, true) {
        return Err(Error::Malformed("more than one root element".into()));
    }
    Ok(())
}

fn xml_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> Error {
    Error::Malformed(format!(
        "XML error at byte {}: {e}",
        reader.error_position()
    ))
}

/// Open element plus the text gathered inside it so far.
struct Frame {
    name: Vec<u8>,
    text: String,
}

fn parent_is(stack: &[Frame], name: &[u8]) -> bool {
    stack.last().is_some_and(|f| f.name == name)
}

fn grandparent_is(stack: &[Frame], name: &[u8]) -> bool {
    stack.len() >= 2 && stack[stack.len() - 2].name == name
}

/// Consume events up to the matching `</PubmedArticle>`.
fn parse_article(reader: &mut Reader<&[u8]>) -> Result<ArticleFields> {
    let mut article = ArticleFields::default();
    let mut author: Option<AuthorFields> = None;
    let mut stack: Vec<Frame> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(reader, e))?
        {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"Author" {
                    author = Some(AuthorFields::default());
                }
                stack.push(Frame {
                    name,
                    text: String::new(),
                });
            }
            Event::Empty(e) => {
                // `<Author/>` has no last name, so there is nothing to collect.
                let name = e.name().as_ref().to_vec();
                if name != b"Author" {
                    close_element(&name, String::new(), &stack, &mut article, &mut author);
                }
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Event::CData(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Event::GeneralRef(r) => {
                let entity = String::from_utf8_lossy(&r).to_string();
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&resolve_entity(&entity)?);
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"PubmedArticle" && stack.is_empty() {
                    break;
                }
                let Some(frame) = stack.pop() else {
                    return Err(Error::Malformed("unbalanced PubmedArticle".to_string()));
                };
                close_element(&frame.name, frame.text.clone(), &stack, &mut article, &mut author);
                // Inline markup (<i>, <sup>, ...) keeps contributing to the enclosing element.
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&frame.text);
                }
            }
            Event::Eof => {
                return Err(Error::Malformed(
                    "document ended inside a PubmedArticle".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(article)
}

/// Record `text` for the element `name` that just closed. `stack` holds its ancestors.
fn close_element(
    name: &[u8],
    text: String,
    stack: &[Frame],
    article: &mut ArticleFields,
    author: &mut Option<AuthorFields>,
) {
    // Affiliations are reported verbatim; everything else is trimmed.
    if name == b"Affiliation" {
        if parent_is(stack, b"AffiliationInfo") && grandparent_is(stack, b"Author") {
            if let Some(a) = author.as_mut() {
                a.affiliation.get_or_insert(text);
            }
        }
        return;
    }
    let text = text.trim().to_string();
    match name {
        b"PMID" => {
            article.pmid.get_or_insert(text);
        }
        b"ArticleTitle" => {
            article.title.get_or_insert(text);
        }
        b"Year" if parent_is(stack, b"PubDate") => {
            article.year.get_or_insert(text);
        }
        b"LastName" if parent_is(stack, b"Author") => {
            if let Some(a) = author.as_mut() {
                a.last_name.get_or_insert(text);
            }
        }
        b"Author" => {
            if let Some(a) = author.take() {
                article.authors.push(a);
            }
        }
        _ => {}
    }
}

/// Expand a `&name;` or `&#NN;` reference found in text content.
fn resolve_entity(entity: &str) -> Result<String> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        return code
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .ok_or_else(|| Error::Malformed(format!("invalid character reference &{entity};")));
    }
    quick_xml::escape::resolve_predefined_entity(entity)
        .map(str::to_string)
        .ok_or_else(|| Error::Malformed(format!("unknown entity &{entity};")))
}
