//! Passenger-name normalization
//!
//! Manifests spell the same person many ways ("JE", "Jeff Epstein", ...).
//! The normalizer maps known spellings to one canonical display name through
//! an explicit alias table. Matching is exact on the cleaned, lowercased text:
//! there is no edit-distance or phonetic matching, so two unmapped spellings
//! of one person stay two identities.

use crate::classify::BUILTIN_ALIASES;
use std::collections::HashMap;

const QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Canonicalizes raw passenger-name text
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    aliases: HashMap<String, String>,
}

impl NameNormalizer {
    /// Create a normalizer with the built-in alias table
    pub fn new() -> Self {
        Self::with_aliases(std::iter::empty::<(String, String)>())
    }

    /// Create a normalizer with the built-in table plus extra aliases
    ///
    /// Extra entries override built-in ones with the same alias.
    pub fn with_aliases<I, A, C>(extra: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: Into<String>,
    {
        let mut aliases: HashMap<String, String> = BUILTIN_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();

        for (alias, canonical) in extra {
            aliases.insert(clean(alias.as_ref()).to_lowercase(), canonical.into());
        }

        Self { aliases }
    }

    /// Normalize a raw manifest name into its canonical display form
    ///
    /// Returns `None` when nothing is left after cleaning.
    ///
    /// # Examples
    ///
    /// ```
    /// use flightlog_domain::NameNormalizer;
    ///
    /// let normalizer = NameNormalizer::new();
    /// assert_eq!(normalizer.normalize(" 'JE' ").as_deref(), Some("Jeffrey Epstein"));
    /// assert_eq!(normalizer.normalize("Jane  Doe").as_deref(), Some("Jane Doe"));
    /// assert_eq!(normalizer.normalize("\"\""), None);
    /// ```
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return None;
        }

        let canonical = self
            .aliases
            .get(&cleaned.to_lowercase())
            .cloned()
            .unwrap_or(cleaned);

        Some(canonical)
    }

    /// Cache key for a canonical name
    pub fn key(canonical: &str) -> String {
        canonical.to_lowercase()
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip quotes and collapse whitespace
fn clean(raw: &str) -> String {
    let unquoted: String = raw.chars().filter(|c| !QUOTES.contains(c)).collect();
    unquoted.split_whitespace().collect::<Vec<_>>().join(" ")
}
