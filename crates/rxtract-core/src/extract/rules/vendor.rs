//! Vendor name guess.
//!
//! This is a weak heuristic, not a vendor detector: it takes the first run of
//! letters and spaces that sits right before a number, which on most
//! receipts is the header line above the street address.

use serde::{Deserialize, Serialize};

use super::patterns::KNOWN_VENDOR;
use super::FieldExtractor;

/// How the vendor name is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorHeuristic {
    /// Report the known brand whenever it appears, else fall back to
    /// `WordsBeforeDigit`.
    #[default]
    BrandParity,
    /// Words preceding the first number only.
    WordsBeforeDigit,
}

/// Vendor name extractor.
pub struct VendorExtractor {
    heuristic: VendorHeuristic,
}

impl VendorExtractor {
    pub fn new() -> Self {
        Self {
            heuristic: VendorHeuristic::default(),
        }
    }

    pub fn with_heuristic(mut self, heuristic: VendorHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_vendor_name(text, self.heuristic)
    }
}

/// Guess the vendor name.
pub fn extract_vendor_name(text: &str, heuristic: VendorHeuristic) -> Option<String> {
    if heuristic == VendorHeuristic::BrandParity && text.contains(KNOWN_VENDOR) {
        return Some(KNOWN_VENDOR.to_string());
    }
    words_before_digit(text)
}

/// First run of letters and horizontal spaces followed (after optional
/// whitespace) by a digit, trimmed.
fn words_before_digit(text: &str) -> Option<String> {
    let mut rest = text;

    while !rest.is_empty() {
        let start = match rest.find(is_run_char) {
            Some(start) => start,
            None => return None,
        };
        let run = &rest[start..];
        let len = run.find(|c: char| !is_run_char(c)).unwrap_or(run.len());
        let (candidate, after) = run.split_at(len);

        let candidate = candidate.trim();
        if !candidate.is_empty() && digit_follows(after) {
            return Some(candidate.to_string());
        }

        // `after` starts with a non-run char (or is empty)
        let mut chars = after.chars();
        chars.next();
        rest = chars.as_str();
    }

    None
}

fn is_run_char(c: char) -> bool {
    c.is_alphabetic() || c == '_' || (c.is_whitespace() && c != '\n')
}

fn digit_follows(s: &str) -> bool {
    s.trim_start().starts_with(|c: char| c.is_ascii_digit())
}
