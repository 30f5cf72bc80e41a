//! Publication catalog
//!
//! Browsing is a lookup over a fixed code→name table, not live discovery:
//! the upstream publication codes are stable and the set changes rarely.
//! The table is read-only after load and injected into the catalog so tests
//! can substitute entries.

use serde::{Deserialize, Serialize};

/// One catalog row
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// First year of publication, when bounded
    pub first_year: Option<u16>,
    /// Last year of publication; `None` means still current
    pub last_year: Option<u16>,
}

/// Built-in publication table
static DEFAULT_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        code: "w",
        name: "The Watchtower (Study Edition)",
        description: "Monthly study magazine with congregation study articles",
        category: "magazine",
        first_year: Some(1950),
        last_year: None,
    },
    CatalogEntry {
        code: "wp",
        name: "The Watchtower (Public Edition)",
        description: "Public magazine addressing Bible questions",
        category: "magazine",
        first_year: Some(2008),
        last_year: None,
    },
    CatalogEntry {
        code: "g",
        name: "Awake!",
        description: "General-interest magazine on everyday life and the natural world",
        category: "magazine",
        first_year: Some(1970),
        last_year: None,
    },
    CatalogEntry {
        code: "mwb",
        name: "Our Christian Life and Ministry Meeting Workbook",
        description: "Midweek meeting schedule and study material",
        category: "workbook",
        first_year: Some(2016),
        last_year: None,
    },
    CatalogEntry {
        code: "nwt",
        name: "New World Translation of the Holy Scriptures",
        description: "Bible translation, 2013 revision",
        category: "bible",
        first_year: Some(2013),
        last_year: None,
    },
    CatalogEntry {
        code: "it",
        name: "Insight on the Scriptures",
        description: "Two-volume Bible encyclopedia",
        category: "reference",
        first_year: Some(1988),
        last_year: None,
    },
    CatalogEntry {
        code: "lff",
        name: "Enjoy Life Forever!",
        description: "Interactive Bible course",
        category: "book",
        first_year: Some(2021),
        last_year: None,
    },
    CatalogEntry {
        code: "bhs",
        name: "What Can the Bible Teach Us?",
        description: "Bible study textbook",
        category: "book",
        first_year: Some(2015),
        last_year: None,
    },
    CatalogEntry {
        code: "cl",
        name: "Draw Close to Jehovah",
        description: "Book on God's principal attributes",
        category: "book",
        first_year: Some(2002),
        last_year: None,
    },
    CatalogEntry {
        code: "sjj",
        name: "Sing Out Joyfully to Jehovah",
        description: "Songbook with vocal and instrumental arrangements",
        category: "songbook",
        first_year: Some(2016),
        last_year: None,
    },
    CatalogEntry {
        code: "yb",
        name: "Yearbook",
        description: "Annual report of worldwide activity, discontinued",
        category: "reference",
        first_year: Some(1970),
        last_year: Some(2017),
    },
];

/// Catalog entry as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub code: String,
    pub name: String,
    pub description: String,
    /// Publication-year range, e.g. "1950-" or "1970-2017"
    pub years: Option<String>,
    pub language: String,
}

/// Read-only publication lookup
#[derive(Debug, Clone)]
pub struct PublicationCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for PublicationCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_CATALOG.to_vec(),
        }
    }
}

impl PublicationCatalog {
    /// Catalog backed by the built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog from substitute entries (testing)
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Browse publications, optionally filtered by category and year.
    ///
    /// The language tags the returned entries; it never filters, since the
    /// table lists editions by code, not locale.
    pub fn browse(
        &self,
        category: Option<&str>,
        language: &str,
        year: Option<u16>,
    ) -> Vec<Publication> {
        self.entries
            .iter()
            .filter(|entry| {
                category
                    .map(|c| entry.category.eq_ignore_ascii_case(c))
                    .unwrap_or(true)
            })
            .filter(|entry| {
                year.map(|y| {
                    entry.first_year.map(|f| y >= f).unwrap_or(true)
                        && entry.last_year.map(|l| y <= l).unwrap_or(true)
                })
                .unwrap_or(true)
            })
            .map(|entry| Publication {
                code: entry.code.to_string(),
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                years: entry.first_year.map(|f| match entry.last_year {
                    Some(l) => format!("{}-{}", f, l),
                    None => format!("{}-", f),
                }),
                language: language.to_string(),
            })
            .collect()
    }

    /// Display name for a publication code, when known
    pub fn name_for(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_all_returns_full_table() {
        let catalog = PublicationCatalog::new();
        let all = catalog.browse(None, "en", None);
        assert_eq!(all.len(), DEFAULT_CATALOG.len());
        assert!(all.iter().all(|p| p.language == "en"));
    }

    #[test]
    fn test_browse_filters_by_category() {
        let catalog = PublicationCatalog::new();
        let magazines = catalog.browse(Some("magazine"), "en", None);
        assert!(!magazines.is_empty());
        assert!(magazines.iter().any(|p| p.code == "w"));
        assert!(magazines.iter().all(|p| p.code != "nwt"));
    }

    #[test]
    fn test_browse_filters_by_year() {
        let catalog = PublicationCatalog::new();
        let in_2020 = catalog.browse(None, "en", Some(2020));
        // Yearbook ended 2017; Enjoy Life Forever! started 2021
        assert!(in_2020.iter().all(|p| p.code != "yb"));
        assert!(in_2020.iter().all(|p| p.code != "lff"));
        assert!(in_2020.iter().any(|p| p.code == "w"));
    }

    #[test]
    fn test_years_rendering() {
        let catalog = PublicationCatalog::new();
        let all = catalog.browse(None, "es", None);
        let yearbook = all.iter().find(|p| p.code == "yb").unwrap();
        assert_eq!(yearbook.years.as_deref(), Some("1970-2017"));
        let watchtower = all.iter().find(|p| p.code == "w").unwrap();
        assert_eq!(watchtower.years.as_deref(), Some("1950-"));
    }

    #[test]
    fn test_name_lookup() {
        let catalog = PublicationCatalog::new();
        assert_eq!(catalog.name_for("g"), Some("Awake!"));
        assert_eq!(catalog.name_for("zzz"), None);
    }

    #[test]
    fn test_substitute_entries() {
        let catalog = PublicationCatalog::with_entries(vec![CatalogEntry {
            code: "t",
            name: "Test Publication",
            description: "For tests",
            category: "test",
            first_year: None,
            last_year: None,
        }]);
        let all = catalog.browse(None, "en", Some(1900));
        assert_eq!(all.len(), 1);
        assert!(all[0].years.is_none());
    }
}
