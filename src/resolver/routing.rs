//! Language routing table
//!
//! Upstream paths embed a per-language routing pair: `lp` selects the
//! language edition, `rsconf` a revision configuration. The table is
//! read-only after load and injected into the router so tests can
//! substitute their own entries.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Routing pair for one language edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEntry {
    /// Language edition token
    pub lp: String,
    /// Revision configuration token
    pub rsconf: String,
}

impl RoutingEntry {
    /// Create a routing entry from its two tokens
    pub fn new(lp: impl Into<String>, rsconf: impl Into<String>) -> Self {
        Self {
            lp: lp.into(),
            rsconf: rsconf.into(),
        }
    }
}

/// Built-in routing pairs for the languages the upstream hosts separately.
/// Languages absent here fall back to `{lp: code, rsconf: "r1"}`.
static DEFAULT_ROUTING_TABLE: Lazy<HashMap<&'static str, (&'static str, &'static str)>> =
    Lazy::new(|| {
        HashMap::from([
            ("en", ("e", "r1")),
            ("ru", ("u", "r2")),
            ("es", ("s", "r4")),
            ("pt", ("t", "r5")),
            ("it", ("i", "r6")),
            ("ja", ("j", "r7")),
            ("ko", ("ko", "r8")),
            ("zh", ("ch", "r9")),
            ("de", ("x", "r10")),
            ("fr", ("f", "r30")),
        ])
    });

/// Normalize an ISO-ish language tag to the table key:
/// lowercase, segment before the first hyphen/underscore, "en" when absent.
pub fn normalize_language(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return "en".to_string(),
    };
    let lowered = raw.trim().to_lowercase();
    lowered
        .split(['-', '_'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("en")
        .to_string()
}

/// Read-only language → routing-pair lookup
#[derive(Debug, Clone)]
pub struct LanguageRouter {
    table: HashMap<String, RoutingEntry>,
}

impl Default for LanguageRouter {
    fn default() -> Self {
        let table = DEFAULT_ROUTING_TABLE
            .iter()
            .map(|(code, (lp, rsconf))| (code.to_string(), RoutingEntry::new(*lp, *rsconf)))
            .collect();
        Self { table }
    }
}

impl LanguageRouter {
    /// Create a router backed by the built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router from a substitute table (testing)
    pub fn with_table(table: HashMap<String, RoutingEntry>) -> Self {
        Self { table }
    }

    /// Resolve a raw language tag to its routing pair.
    ///
    /// Unknown languages fall back to `{lp: code, rsconf: "r1"}`, except
    /// "en" which always maps to `lp = "e"`.
    pub fn resolve(&self, raw: Option<&str>) -> (String, RoutingEntry) {
        let code = normalize_language(raw);
        let entry = self.table.get(&code).cloned().unwrap_or_else(|| {
            let lp = if code == "en" { "e".to_string() } else { code.clone() };
            RoutingEntry::new(lp, "r1")
        });
        (code, entry)
    }
}
