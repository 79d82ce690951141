//! Label-anchored fields: invoice number and store name.

use super::patterns::{INVOICE_NUMBER, STORE_NAME};
use super::FieldExtractor;

/// Invoice number extractor.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_invoice_number(text)
    }
}

/// Digits after "Invoice Number:".
pub fn extract_invoice_number(text: &str) -> Option<String> {
    INVOICE_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

/// Store name extractor.
pub struct StoreNameExtractor;

impl StoreNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoreNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StoreNameExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_store_name(text)
    }
}

/// Words after "Store Name:" up to the end of that line or the first
/// punctuation mark.
pub fn extract_store_name(text: &str) -> Option<String> {
    let caps = STORE_NAME.captures(text)?;
    let name = caps[1].trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number() {
        assert_eq!(
            extract_invoice_number("Invoice Number: 48213"),
            Some("48213".to_string())
        );
        assert_eq!(
            extract_invoice_number("Invoice Number:48213\nThanks"),
            Some("48213".to_string())
        );
    }

    #[test]
    fn test_invoice_number_requires_label() {
        assert_eq!(extract_invoice_number("Invoice 48213"), None);
        assert_eq!(extract_invoice_number("Invoice Number: INV-7"), None);
    }

    #[test]
    fn test_store_name() {
        assert_eq!(
            extract_store_name("Store Name: Corner Deli\n123 Main Street"),
            Some("Corner Deli".to_string())
        );
        assert_eq!(
            extract_store_name("Store Name:Joe's Pizza"),
            Some("Joe".to_string())
        );
    }

    #[test]
    fn test_store_name_missing_or_blank() {
        assert_eq!(extract_store_name("Corner Deli"), None);
        assert_eq!(extract_store_name("Store Name:   \nCorner Deli"), None);
    }
}
