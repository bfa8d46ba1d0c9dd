//! Section marker parsing
//!
//! Section rows carry no numeric code. Their letter and title are embedded in the
//! description text, e.g. `SECTION A — AGRICULTURE, FORESTRY AND FISHING`. The wording
//! differs per language edition of the source document, so parsing is a strategy.

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

/// Letter and title extracted from a section marker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarker {
    pub letter: String,
    pub title: String,
}

impl SectionMarker {
    /// A section letter is exactly one ASCII uppercase character.
    pub fn has_valid_letter(&self) -> bool {
        let mut chars = self.letter.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
    }
}

/// Strategy for recognizing section marker rows.
pub trait SectionMarkerParser {
    /// Extract the section letter and title-cased title.
    ///
    /// Fails with [`DomainError::UnrecognizedSectionFormat`] when the text is not a marker.
    fn parse(&self, text: &str) -> DomainResult<SectionMarker>;
}

/// Parser built from an introductory keyword and a letter/title separator.
#[derive(Debug, Clone)]
pub struct RegexSectionParser {
    pattern: Regex,
}

impl RegexSectionParser {
    /// Build a parser for `<keyword> <LETTER> <separator> <title>`.
    pub fn new(keyword: &str, separator: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"^{}\s+([A-Z])\s*{}\s*(.+)$",
            regex::escape(keyword.trim()),
            regex::escape(separator.trim()),
        );
        Self::from_pattern(&pattern)
    }

    /// Build a parser from a raw pattern with two capture groups: letter, then title.
    pub fn from_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl SectionMarkerParser for RegexSectionParser {
    fn parse(&self, text: &str) -> DomainResult<SectionMarker> {
        let text = text.trim();
        let caps = self
            .pattern
            .captures(text)
            .ok_or_else(|| DomainError::UnrecognizedSectionFormat {
                text: text.to_string(),
            })?;
        match (caps.get(1), caps.get(2)) {
            (Some(letter), Some(title)) => Ok(SectionMarker {
                letter: letter.as_str().to_string(),
                title: title_case(title.as_str().trim()),
            }),
            _ => Err(DomainError::UnrecognizedSectionFormat {
                text: text.to_string(),
            }),
        }
    }
}

/// Parser composed of two functions, one for the letter and one for the title.
///
/// Either function returning `None` means the text is not a section marker.
/// The title is returned as produced by the title function.
pub struct FnSectionParser<L, T>
where
    L: Fn(&str) -> Option<String>,
    T: Fn(&str) -> Option<String>,
{
    letter: L,
    title: T,
}

impl<L, T> FnSectionParser<L, T>
where
    L: Fn(&str) -> Option<String>,
    T: Fn(&str) -> Option<String>,
{
    pub fn new(letter: L, title: T) -> Self {
        Self { letter, title }
    }
}

impl<L, T> SectionMarkerParser for FnSectionParser<L, T>
where
    L: Fn(&str) -> Option<String>,
    T: Fn(&str) -> Option<String>,
{
    fn parse(&self, text: &str) -> DomainResult<SectionMarker> {
        match ((self.letter)(text), (self.title)(text)) {
            (Some(letter), Some(title)) => Ok(SectionMarker { letter, title }),
            _ => Err(DomainError::UnrecognizedSectionFormat {
                text: text.to_string(),
            }),
        }
    }
}

impl<P: SectionMarkerParser + ?Sized> SectionMarkerParser for Box<P> {
    fn parse(&self, text: &str) -> DomainResult<SectionMarker> {
        (**self).parse(text)
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word is a run of alphabetic characters, so `LAND- UND FORSTWIRTSCHAFT; FISCHEREI`
/// becomes `Land- Und Forstwirtschaft; Fischerei`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
