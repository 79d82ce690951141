//! Receipt parser composing the field rules in a fixed order.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractedRecord, RecordField};

use super::rules::{
    address::extract_address,
    amounts::{extract_amount, extract_tax_amount},
    dates::extract_date,
    items::extract_order_details,
    labels::{extract_invoice_number, extract_store_name},
    payment::extract_payment_method,
    vendor::{extract_vendor_name, VendorHeuristic},
};
use super::RecordExtractor;

/// Result of parsing one text.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: ExtractedRecord,
    /// One entry per field that fell back to its default.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// A single-valued rule: text in, first match out.
type ScalarRule = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Rule-based receipt parser.
pub struct ReceiptParser {
    vendor_heuristic: VendorHeuristic,
    rules: Vec<(RecordField, ScalarRule)>,
}

impl ReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::with_heuristic(VendorHeuristic::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_heuristic(config.vendor_heuristic)
    }

    /// Set the vendor heuristic.
    pub fn with_vendor_heuristic(mut self, heuristic: VendorHeuristic) -> Self {
        self.vendor_heuristic = heuristic;
        self.rules = scalar_rules(heuristic);
        self
    }

    pub fn vendor_heuristic(&self) -> VendorHeuristic {
        self.vendor_heuristic
    }

    fn with_heuristic(vendor_heuristic: VendorHeuristic) -> Self {
        Self {
            vendor_heuristic,
            rules: scalar_rules(vendor_heuristic),
        }
    }

    /// Parse text into a record. Never fails; unmatched fields keep their
    /// defaults and are listed in the warnings.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing receipt from {} characters of text", text.len());

        let mut record = ExtractedRecord::unmatched(text);

        for (field, rule) in &self.rules {
            if let Some(value) = rule(text) {
                if let Some(slot) = record.scalar_mut(*field) {
                    debug!("{} = {:?}", field.key(), value);
                    *slot = value;
                }
            }
        }

        record.order_details = extract_order_details(text);
        debug!("Found {} order items", record.order_details.len());

        let warnings: Vec<String> = record
            .missing_fields()
            .iter()
            .map(|f| format!("Could not extract {}", f.label().to_lowercase()))
            .collect();

        let processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Extracted receipt with {} missing fields in {}ms",
            warnings.len(),
            processing_time_ms
        );

        ExtractionResult {
            record,
            warnings,
            processing_time_ms,
        }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor for ReceiptParser {
    fn extract(&self, text: &str) -> ExtractedRecord {
        self.parse(text).record
    }
}

fn scalar_rules(vendor_heuristic: VendorHeuristic) -> Vec<(RecordField, ScalarRule)> {
    let vendor: ScalarRule =
        Box::new(move |text: &str| extract_vendor_name(text, vendor_heuristic));
    let payment: ScalarRule =
        Box::new(|text: &str| extract_payment_method(text).map(|m| m.as_str().to_string()));

    vec![
        (RecordField::VendorName, vendor),
        (RecordField::Address, Box::new(extract_address) as ScalarRule),
        (RecordField::Amount, Box::new(extract_amount) as ScalarRule),
        (RecordField::Date, Box::new(extract_date) as ScalarRule),
        (RecordField::InvoiceNumber, Box::new(extract_invoice_number) as ScalarRule),
        (RecordField::PaymentMethod, payment),
        (RecordField::TaxAmount, Box::new(extract_tax_amount) as ScalarRule),
        (RecordField::StoreName, Box::new(extract_store_name) as ScalarRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::*;
    use pretty_assertions::assert_eq;

    const CORNER_DELI: &str = "Store Name: Corner Deli\n123 Main Street, NY\n3/14/2024\n2 Coffee $4.50\nTax $0.50\n$5.00\nCash";

    #[test]
    fn test_parse_corner_deli() {
        let record = ReceiptParser::new().parse(CORNER_DELI).record;

        assert_eq!(record.store_name, "Corner Deli");
        assert_eq!(record.address, "123 Main Street, NY");
        assert_eq!(record.date, "3/14/2024");
        assert_eq!(record.order_details, vec![OrderItem::new("2 Coffee", "$4.50")]);
        assert_eq!(record.tax_amount, "$0.50");
        assert_eq!(record.amount, "$5.00");
        assert_eq!(record.payment_method, "Cash");
        assert_eq!(record.vendor_name, "Corner Deli");
        assert_eq!(record.invoice_number, UNKNOWN_INVOICE);
        assert_eq!(record.extracted_text, CORNER_DELI);
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let result = ReceiptParser::new().parse("");
        assert_eq!(result.record, ExtractedRecord::unmatched(""));
        assert_eq!(result.warnings.len(), 9);
        assert!(result.warnings.contains(&"Could not extract date".to_string()));
    }

    #[test]
    fn test_noise_never_fails() {
        let noise = "@@##$$ 9/9 $. $1. \n\n\t ~~~ Invoice Number: Tax $ Store Name: !";
        let record = ReceiptParser::new().extract(noise);
        assert_eq!(record.date, UNKNOWN_DATE);
        assert_eq!(record.invoice_number, UNKNOWN_INVOICE);
        assert_eq!(record.store_name, UNKNOWN_STORE);
        assert_eq!(record.amount, NOT_AVAILABLE);
        assert_eq!(record.extracted_text, noise);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = ReceiptParser::new();
        assert_eq!(parser.extract(CORNER_DELI), parser.extract(CORNER_DELI));
    }

    #[test]
    fn test_invoice_label() {
        let parser = ReceiptParser::new();
        assert_eq!(
            parser.extract("Invoice Number: 48213").invoice_number,
            "48213"
        );
        assert_eq!(parser.extract("Receipt 48213").invoice_number, UNKNOWN_INVOICE);
    }

    #[test]
    fn test_vendor_heuristic_from_config() {
        let config = ExtractionConfig {
            vendor_heuristic: VendorHeuristic::WordsBeforeDigit,
        };
        let parser = ReceiptParser::from_config(&config);
        let record = parser.extract("Green Leaf\n10 Park Ave\nSweetgreen rewards");
        assert_eq!(record.vendor_name, "Green Leaf");

        let record = ReceiptParser::new().extract("Green Leaf\n10 Park Ave\nSweetgreen rewards");
        assert_eq!(record.vendor_name, "Sweetgreen");
    }
}
