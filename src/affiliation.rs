/// Substrings that mark an affiliation as academic. Matched against the lower-cased text.
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "research center",
    "hospital",
];

/// Whether `affiliation` looks like an academic institution rather than a company.
pub fn is_academic(affiliation: &str) -> bool {
    let lowered = affiliation.to_lowercase();
    ACADEMIC_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
