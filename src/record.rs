/// Column names of the report, in output order.
pub const COLUMNS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Placeholder year for articles whose `PubDate` carries no `Year`.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// A retained (non-academic) author together with the affiliation that qualified them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub name: String,
    pub affiliation: String,
}

/// One article that has at least one non-academic author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub pmid: String,
    pub title: String,
    pub publication_year: String,
    authors: Vec<Contributor>,
    pub corresponding_email: Option<String>,
}

impl Record {
    /// Build a record, or `None` when no author survived the academic filter.
    pub fn new(
        pmid: String,
        title: String,
        publication_year: Option<String>,
        authors: Vec<Contributor>,
        corresponding_email: Option<String>,
    ) -> Option<Self> {
        if authors.is_empty() {
            return None;
        }
        Some(Record {
            pmid,
            title,
            publication_year: publication_year.unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
            authors,
            corresponding_email,
        })
    }

    pub fn authors(&self) -> &[Contributor] {
        &self.authors
    }

    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn affiliations(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.affiliation.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The six report cells, in [`COLUMNS`] order.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.pmid.clone(),
            self.title.clone(),
            self.publication_year.clone(),
            self.author_names(),
            self.affiliations(),
            self.corresponding_email.clone().unwrap_or_default(),
        ]
    }
}
