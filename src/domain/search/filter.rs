use crate::shared::{page_offset, PAGE_SIZE};

/// Normalized search criteria.
///
/// Blank inputs are treated as absent, so an all-blank filter matches
/// every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Substring matched against name, both genres, other and location.
    pub name: Option<String>,
    /// Any listing whose main or sub genre contains one of these matches.
    pub genres: Vec<String>,
    /// Exact tag values; listings with more of them rank first.
    pub tags: Vec<String>,
    /// 1-based page number.
    pub page: u32,
}

impl SearchFilter {
    pub fn new<G, T>(name: Option<&str>, genres: G, tags: T, page: u32) -> Self
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            name: name.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
            genres: clean_terms(genres),
            tags: clean_terms(tags),
            page: page.max(1),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.name.is_none() && self.genres.is_empty() && self.tags.is_empty()
    }

    pub fn limit(&self) -> u32 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, PAGE_SIZE)
    }
}

fn clean_terms<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut terms: Vec<String> = Vec::new();
    for term in raw {
        let term = term.as_ref().trim();
        if !term.is_empty() && !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}
