//! Locale handling for client-facing messages
//!
//! The request locale comes from the `Accept-Language` header and drives which
//! message bundle is used when field errors are rendered.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod extractor;
pub mod message_source;

pub use extractor::{AcceptLocale, DefaultLocale};
pub use message_source::{MessageSource, MessageSourceError, StaticMessageSource, format_message};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Empty locale tag")]
    Empty,

    #[error("Invalid language subtag: {0}")]
    InvalidLanguage(String),
}

/// A language with an optional region, e.g. `fr` or `fr-FR`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            region: region.map(|r| r.to_ascii_uppercase()),
        }
    }

    /// Parse a BCP 47-ish tag. Underscores are accepted as separators, script
    /// and variant subtags are skipped.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut subtags = tag.split(['-', '_']);
        let language = subtags.next().unwrap_or_default();
        if !(2..=8).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::InvalidLanguage(language.to_string()));
        }

        let region = subtags.find(|s| {
            (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
                || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
        });

        Ok(Self::new(language, region))
    }

    /// Pick the preferred locale out of an `Accept-Language` header value.
    ///
    /// The highest quality wins and ties keep header order. Wildcards,
    /// `q=0` entries and unparseable tags are ignored.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut best: Option<(f32, Locale)> = None;

        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let tag = parts.next().unwrap_or_default().trim();
            if tag == "*" {
                continue;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                if let Some(q) = param.trim().strip_prefix("q=") {
                    quality = q.trim().parse().unwrap_or(0.0);
                }
            }
            if !(quality > 0.0 && quality <= 1.0) {
                continue;
            }

            let Ok(locale) = Locale::parse(tag) else {
                continue;
            };
            if best.as_ref().is_none_or(|(q, _)| quality > *q) {
                best = Some((quality, locale));
            }
        }

        best.map(|(_, locale)| locale)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    /// This locale followed by its language-only form, when different.
    pub fn candidates(&self) -> Vec<Locale> {
        let mut candidates = vec![self.clone()];
        if self.region.is_some() {
            candidates.push(self.language_only());
        }
        candidates
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", None)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
