//! Abbreviation expander.
//!
//! Annotates every whole-word occurrence of a dictionary token with its
//! expansion: `"ASAP"` becomes `"ASAP (as soon as possible)"`.
//!
//! All tokens are escaped and joined into a single alternation wrapped in
//! word boundaries, so the input is scanned once and partial-word hits such
//! as `"ASAPwood"` are never touched. Alternation is leftmost-first: when two
//! tokens could match at the same position, the one listed first in the
//! dictionary wins.
//!
//! Expansion is **not** idempotent. The bare token survives in the annotated
//! output, so expanding twice annotates it twice. Expand each raw input once.

use regex::{Captures, Regex};
use tracing::debug;

use crate::abbreviations::AbbreviationDict;
use crate::error::ExpansionError;

/// Compiled expander for one dictionary.
#[derive(Debug, Clone)]
pub struct Expander {
    dict: AbbreviationDict,
    /// `None` for an empty dictionary (identity expansion).
    pattern: Option<Regex>,
}

impl Expander {
    /// Compile the alternation pattern for `dict`.
    pub fn new(dict: AbbreviationDict) -> Result<Self, ExpansionError> {
        let pattern = if dict.is_empty() {
            None
        } else {
            let alternation = dict
                .tokens()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\b(?:{alternation})\b"))?)
        };

        Ok(Self { dict, pattern })
    }

    /// Expander over the built-in dictionary.
    pub fn with_default_dictionary() -> Result<Self, ExpansionError> {
        Self::new(crate::abbreviations::default_dictionary())
    }

    pub fn dictionary(&self) -> &AbbreviationDict {
        &self.dict
    }

    /// Annotate abbreviations in `raw_email`.
    pub fn expand(&self, raw_email: &str) -> String {
        let Some(ref pattern) = self.pattern else {
            return raw_email.to_string();
        };

        let mut hits = 0usize;
        let expanded = pattern.replace_all(raw_email, |caps: &Captures| {
            let token = &caps[0];
            match self.dict.get(token) {
                Some(full) => {
                    hits += 1;
                    format!("{token} ({full})")
                }
                None => token.to_string(),
            }
        });

        debug!(hits, "Expanded abbreviations");
        expanded.into_owned()
    }
}
