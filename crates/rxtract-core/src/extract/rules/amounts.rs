//! Total and tax amount extraction.
//!
//! Amounts stay in their printed form ("$12.34"); use
//! [`parse_currency`](crate::models::record::parse_currency) for arithmetic.

use super::patterns::{CURRENCY_AMOUNT, LABELED_TOTAL, STANDALONE_AMOUNT, TAX_AMOUNT};
use super::FieldExtractor;

/// Total amount extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_amount(text)
    }

    /// Every currency amount in text order.
    fn extract_all(&self, text: &str) -> Vec<String> {
        CURRENCY_AMOUNT
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Receipt total.
///
/// Tried in order: an amount labeled as a total, an amount standing alone on
/// its line, then the first currency amount anywhere.
pub fn extract_amount(text: &str) -> Option<String> {
    if let Some(caps) = LABELED_TOTAL.captures(text) {
        return Some(caps[1].to_string());
    }

    if let Some(caps) = STANDALONE_AMOUNT.captures(text) {
        return Some(caps[1].to_string());
    }

    CURRENCY_AMOUNT.find(text).map(|m| m.as_str().to_string())
}

/// Tax extractor.
pub struct TaxExtractor;

impl TaxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_tax_amount(text)
    }
}

/// Amount following the "Tax" label.
pub fn extract_tax_amount(text: &str) -> Option<String> {
    TAX_AMOUNT.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_amount_anywhere() {
        assert_eq!(
            extract_amount("Paid $12.34 with card, change $0.66 due"),
            Some("$12.34".to_string())
        );
    }

    #[test]
    fn test_standalone_line_beats_line_items() {
        let text = "2 Coffee $4.50\nTax $0.50\n$5.00\nCash";
        assert_eq!(extract_amount(text), Some("$5.00".to_string()));
    }

    #[test]
    fn test_labeled_total_wins() {
        let text = "1 Bagel $3.00\nSubtotal $3.00\nTOTAL: $3.27\n$20.00\n";
        assert_eq!(extract_amount(text), Some("$3.27".to_string()));
    }

    #[test]
    fn test_requires_two_decimals() {
        assert_eq!(extract_amount("Donation $5"), None);
        assert_eq!(extract_amount("Donation $5.0"), None);
        assert_eq!(extract_amount("no money here"), None);
    }

    #[test]
    fn test_amount_glued_to_ocr_noise() {
        assert_eq!(extract_amount("$12.34USD"), Some("$12.34".to_string()));
        assert_eq!(extract_amount("Paid $7.991"), Some("$7.99".to_string()));
        assert_eq!(extract_amount("Total $9.50USD"), Some("$9.50".to_string()));
        assert_eq!(
            extract_amount("$12.34USD"),
            extract_tax_amount("Tax $12.34USD")
        );
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let found = extractor.extract_all("2 Coffee $4.50\nTax $0.50\n$5.00");
        assert_eq!(found, vec!["$4.50", "$0.50", "$5.00"]);
    }

    #[test]
    fn test_tax_amount() {
        assert_eq!(extract_tax_amount("Tax $0.50"), Some("$0.50".to_string()));
        assert_eq!(extract_tax_amount("Tax$1.25"), Some("$1.25".to_string()));
        assert_eq!(extract_tax_amount("Sales tax $1.25"), None);
        assert_eq!(extract_tax_amount("Tax 0.50"), None);
    }
}
