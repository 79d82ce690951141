//! Structured receipt record produced by the field extractor.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel for a missing vendor name.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";
/// Sentinel for a missing street address.
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";
/// Sentinel for a missing currency amount (total and tax).
pub const NOT_AVAILABLE: &str = "N/A";
/// Sentinel for a missing date.
pub const UNKNOWN_DATE: &str = "Unknown Date";
/// Sentinel for a missing invoice number.
pub const UNKNOWN_INVOICE: &str = "Unknown Invoice";
/// Sentinel for a missing payment method.
pub const UNKNOWN_PAYMENT_METHOD: &str = "Unknown Payment Method";
/// Sentinel for a missing store name.
pub const UNKNOWN_STORE: &str = "Unknown Store";

/// Fields extracted from a single receipt.
///
/// Every scalar field holds either a matched value or its sentinel, so a
/// record never has holes. `extracted_text` keeps the OCR output verbatim
/// so the record can be re-parsed without running recognition again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub vendor_name: String,
    pub address: String,
    pub amount: String,
    pub date: String,
    pub invoice_number: String,
    pub payment_method: String,
    pub tax_amount: String,
    pub store_name: String,
    pub order_details: Vec<OrderItem>,
    pub extracted_text: String,
}

/// A single purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Quantity and description, e.g. "2 Coffee".
    pub item: String,
    /// Currency formatted price, e.g. "$4.50".
    pub price: String,
}

impl OrderItem {
    pub fn new(item: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            price: price.into(),
        }
    }

    /// Numeric value of the price, if it parses.
    pub fn price_value(&self) -> Option<Decimal> {
        parse_currency(&self.price)
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.item, self.price)
    }
}

/// Top-level record fields, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    VendorName,
    Address,
    Amount,
    Date,
    InvoiceNumber,
    PaymentMethod,
    TaxAmount,
    StoreName,
    OrderDetails,
    ExtractedText,
}

impl RecordField {
    /// All fields in record order.
    pub const ALL: [RecordField; 10] = [
        RecordField::VendorName,
        RecordField::Address,
        RecordField::Amount,
        RecordField::Date,
        RecordField::InvoiceNumber,
        RecordField::PaymentMethod,
        RecordField::TaxAmount,
        RecordField::StoreName,
        RecordField::OrderDetails,
        RecordField::ExtractedText,
    ];

    /// Serialized key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            RecordField::VendorName => "vendorName",
            RecordField::Address => "address",
            RecordField::Amount => "amount",
            RecordField::Date => "date",
            RecordField::InvoiceNumber => "invoiceNumber",
            RecordField::PaymentMethod => "paymentMethod",
            RecordField::TaxAmount => "taxAmount",
            RecordField::StoreName => "storeName",
            RecordField::OrderDetails => "orderDetails",
            RecordField::ExtractedText => "extractedText",
        }
    }

    /// Human-readable label used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            RecordField::VendorName => "Vendor Name",
            RecordField::Address => "Address",
            RecordField::Amount => "Amount",
            RecordField::Date => "Date",
            RecordField::InvoiceNumber => "Invoice Number",
            RecordField::PaymentMethod => "Payment Method",
            RecordField::TaxAmount => "Tax Amount",
            RecordField::StoreName => "Store Name",
            RecordField::OrderDetails => "Order Details",
            RecordField::ExtractedText => "Extracted Text",
        }
    }

    /// Sentinel used when nothing matched. `None` for fields without one.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            RecordField::VendorName => Some(UNKNOWN_VENDOR),
            RecordField::Address => Some(UNKNOWN_ADDRESS),
            RecordField::Amount | RecordField::TaxAmount => Some(NOT_AVAILABLE),
            RecordField::Date => Some(UNKNOWN_DATE),
            RecordField::InvoiceNumber => Some(UNKNOWN_INVOICE),
            RecordField::PaymentMethod => Some(UNKNOWN_PAYMENT_METHOD),
            RecordField::StoreName => Some(UNKNOWN_STORE),
            RecordField::OrderDetails | RecordField::ExtractedText => None,
        }
    }
}

impl ExtractedRecord {
    /// A record with every field at its default.
    pub fn unmatched(text: impl Into<String>) -> Self {
        Self {
            vendor_name: UNKNOWN_VENDOR.to_string(),
            address: UNKNOWN_ADDRESS.to_string(),
            amount: NOT_AVAILABLE.to_string(),
            date: UNKNOWN_DATE.to_string(),
            invoice_number: UNKNOWN_INVOICE.to_string(),
            payment_method: UNKNOWN_PAYMENT_METHOD.to_string(),
            tax_amount: NOT_AVAILABLE.to_string(),
            store_name: UNKNOWN_STORE.to_string(),
            order_details: Vec::new(),
            extracted_text: text.into(),
        }
    }

    /// Scalar value of a field. Order details are flattened onto one line.
    pub fn value(&self, field: RecordField) -> String {
        match field {
            RecordField::VendorName => self.vendor_name.clone(),
            RecordField::Address => self.address.clone(),
            RecordField::Amount => self.amount.clone(),
            RecordField::Date => self.date.clone(),
            RecordField::InvoiceNumber => self.invoice_number.clone(),
            RecordField::PaymentMethod => self.payment_method.clone(),
            RecordField::TaxAmount => self.tax_amount.clone(),
            RecordField::StoreName => self.store_name.clone(),
            RecordField::OrderDetails => self
                .order_details
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(","),
            RecordField::ExtractedText => self.extracted_text.clone(),
        }
    }

    /// Mutable slot of a scalar field. `None` for order details.
    pub fn scalar_mut(&mut self, field: RecordField) -> Option<&mut String> {
        match field {
            RecordField::VendorName => Some(&mut self.vendor_name),
            RecordField::Address => Some(&mut self.address),
            RecordField::Amount => Some(&mut self.amount),
            RecordField::Date => Some(&mut self.date),
            RecordField::InvoiceNumber => Some(&mut self.invoice_number),
            RecordField::PaymentMethod => Some(&mut self.payment_method),
            RecordField::TaxAmount => Some(&mut self.tax_amount),
            RecordField::StoreName => Some(&mut self.store_name),
            RecordField::ExtractedText => Some(&mut self.extracted_text),
            RecordField::OrderDetails => None,
        }
    }

    /// `(key, value)` pairs in record order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        RecordField::ALL
            .iter()
            .map(|f| (f.key(), self.value(*f)))
            .collect()
    }

    /// Whether a field is still at its sentinel (or empty, for order details).
    pub fn is_default(&self, field: RecordField) -> bool {
        match field {
            RecordField::OrderDetails => self.order_details.is_empty(),
            RecordField::ExtractedText => false,
            _ => field.default_value() == Some(self.value(field).as_str()),
        }
    }

    /// Fields that fell back to their default.
    pub fn missing_fields(&self) -> Vec<RecordField> {
        RecordField::ALL
            .iter()
            .copied()
            .filter(|f| self.is_default(*f))
            .collect()
    }

    /// Fields a rule matched.
    pub fn matched_fields(&self) -> Vec<RecordField> {
        RecordField::ALL
            .iter()
            .copied()
            .filter(|f| *f != RecordField::ExtractedText && !self.is_default(*f))
            .collect()
    }

    /// Parsed payment method, if one was matched.
    pub fn payment(&self) -> Option<PaymentMethod> {
        self.payment_method.parse().ok()
    }

    /// Numeric total, if matched.
    pub fn amount_value(&self) -> Option<Decimal> {
        parse_currency(&self.amount)
    }

    /// Numeric tax, if matched.
    pub fn tax_value(&self) -> Option<Decimal> {
        parse_currency(&self.tax_amount)
    }

    /// Calendar date, if the matched date is a real one.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let mut parts = self.date.split('/');
        let month: u32 = parts.next()?.parse().ok()?;
        let day: u32 = parts.next()?.parse().ok()?;
        let year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Advisory consistency checks. Never changes the record.
    ///
    /// Order items may sum below the total (tax, tips) but never above it.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let amount = self.amount_value();
        if !self.is_default(RecordField::Amount) && amount.is_none() {
            issues.push(format!("Amount {} is not a valid number", self.amount));
        }

        let tax = self.tax_value();
        if !self.is_default(RecordField::TaxAmount) && tax.is_none() {
            issues.push(format!("Tax amount {} is not a valid number", self.tax_amount));
        }

        if !self.is_default(RecordField::Date) && self.calendar_date().is_none() {
            issues.push(format!("Date {} is not a valid calendar date", self.date));
        }

        if let (Some(amount), Some(tax)) = (amount, tax) {
            if tax > amount {
                issues.push(format!(
                    "Tax {} is larger than the total {}",
                    self.tax_amount, self.amount
                ));
            }
        }

        if let Some(amount) = amount {
            let items_total: Decimal = self
                .order_details
                .iter()
                .filter_map(OrderItem::price_value)
                .sum();
            if items_total > amount {
                issues.push(format!(
                    "Order items total ${:.2} exceeds the total {}",
                    items_total, self.amount
                ));
            }
        }

        issues
    }
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self::unmatched(String::new())
    }
}

/// Accepted payment method tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Other")]
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::PayPal,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown payment method: {}", s))
    }
}

/// Parse "$12.34" into a decimal.
pub fn parse_currency(s: &str) -> Option<Decimal> {
    let digits = s.trim().strip_prefix('$')?;
    Decimal::from_str(digits).ok()
}
