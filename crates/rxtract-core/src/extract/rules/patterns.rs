//! Common regex patterns for receipt extraction.
//!
//! OCR line breaks are unreliable but still the best separator available, so
//! free-text runs (`[\w ]`, `[^\S\n]`) never cross a newline. Label matches
//! (`Invoice\sNumber`, `Tax\s?`) still tolerate one wrapped break.

use lazy_static::lazy_static;
use regex::Regex;

/// Brand that the vendor rule recognizes literally in parity mode.
pub const KNOWN_VENDOR: &str = "Sweetgreen";

lazy_static! {
    // Street address: house number, street words, suffix, optional city/state tail
    pub static ref ADDRESS: Regex = Regex::new(
        r"\d{1,5}[^\S\n][\w ]+(?:Ave|Street|Road|Blvd|St)[^\S\n]?[\w ,]*(?:NY|NYC|USA)?"
    ).unwrap();

    // Currency amounts
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"\$\d+\.\d{2}"
    ).unwrap();

    pub static ref LABELED_TOTAL: Regex = Regex::new(
        r"(?i)\b(?:grand\s+total|total|amount\s+due|balance\s+due)\b[^\S\n]*:?[^\S\n]*(\$\d+\.\d{2})"
    ).unwrap();

    pub static ref STANDALONE_AMOUNT: Regex = Regex::new(
        r"(?m)^[^\S\n]*(\$\d+\.\d{2})[^\S\n]*$"
    ).unwrap();

    pub static ref TAX_AMOUNT: Regex = Regex::new(
        r"Tax\s?(\$\d+\.\d{2})"
    ).unwrap();

    // M/D/YYYY, no calendar check
    pub static ref DATE_MDY: Regex = Regex::new(
        r"\d{1,2}/\d{1,2}/\d{4}"
    ).unwrap();

    // Labeled fields
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"Invoice\sNumber:\s?(\d+)"
    ).unwrap();

    pub static ref STORE_NAME: Regex = Regex::new(
        r"Store\sName:[^\S\n]?([\w ]+)"
    ).unwrap();

    pub static ref PAYMENT_METHOD: Regex = Regex::new(
        r"Cash|Credit\sCard|Debit\sCard|PayPal|Other"
    ).unwrap();

    // "<qty> <description> $<price>" on one line
    pub static ref ORDER_ITEM: Regex = Regex::new(
        r"(\d+[^\S\n][\w ]+)[^\S\n](\$\d+\.\d{2})"
    ).unwrap();
}
