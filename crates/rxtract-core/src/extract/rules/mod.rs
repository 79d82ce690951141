//! Rule-based field extractors for receipts.
//!
//! Each rule looks at the whole text on its own and never consults another
//! rule's result.

pub mod address;
pub mod amounts;
pub mod dates;
pub mod items;
pub mod labels;
pub mod patterns;
pub mod payment;
pub mod vendor;

pub use address::{extract_address, AddressExtractor};
pub use amounts::{extract_amount, extract_tax_amount, AmountExtractor, TaxExtractor};
pub use dates::{extract_date, DateExtractor};
pub use items::{extract_order_details, OrderItemExtractor};
pub use labels::{extract_invoice_number, extract_store_name, InvoiceNumberExtractor, StoreNameExtractor};
pub use payment::{extract_payment_method, PaymentMethodExtractor};
pub use vendor::{extract_vendor_name, VendorExtractor, VendorHeuristic};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}
