//! Street address extraction.

use super::patterns::ADDRESS;
use super::FieldExtractor;

/// Street address extractor.
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_address(text)
    }

    fn extract_all(&self, text: &str) -> Vec<String> {
        ADDRESS
            .find_iter(text)
            .filter_map(|m| clean(m.as_str()))
            .collect()
    }
}

/// First street-address-shaped substring.
pub fn extract_address(text: &str) -> Option<String> {
    ADDRESS.find(text).and_then(|m| clean(m.as_str()))
}

fn clean(s: &str) -> Option<String> {
    let s = s.trim_end_matches([' ', ',', '\t']);
    (!s.is_empty()).then(|| s.to_string())
}
