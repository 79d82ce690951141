//! Payment method extraction.

use crate::models::record::PaymentMethod;

use super::patterns::PAYMENT_METHOD;
use super::FieldExtractor;

/// Payment method extractor.
pub struct PaymentMethodExtractor;

impl PaymentMethodExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PaymentMethodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PaymentMethodExtractor {
    type Output = PaymentMethod;

    fn extract(&self, text: &str) -> Option<PaymentMethod> {
        extract_payment_method(text)
    }

    fn extract_all(&self, text: &str) -> Vec<PaymentMethod> {
        PAYMENT_METHOD
            .find_iter(text)
            .filter_map(|m| normalize(m.as_str()))
            .collect()
    }
}

/// Earliest payment token in the text.
pub fn extract_payment_method(text: &str) -> Option<PaymentMethod> {
    PAYMENT_METHOD.find(text).and_then(|m| normalize(m.as_str()))
}

// "Credit\nCard" is the same token as "Credit Card".
fn normalize(token: &str) -> Option<PaymentMethod> {
    let token = token.split_whitespace().collect::<Vec<_>>().join(" ");
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(
            extract_payment_method("Paid by Debit Card\nCash back $0.00"),
            Some(PaymentMethod::DebitCard)
        );
        assert_eq!(
            extract_payment_method("Cash\nor Credit Card"),
            Some(PaymentMethod::Cash)
        );
    }

    #[test]
    fn test_wrapped_token_is_normalized() {
        assert_eq!(
            extract_payment_method("Credit\nCard ****1234"),
            Some(PaymentMethod::CreditCard)
        );
    }

    #[test]
    fn test_no_payment_method() {
        assert_eq!(extract_payment_method("Visa ****1234"), None);
    }

    #[test]
    fn test_extract_all() {
        let extractor = PaymentMethodExtractor::new();
        assert_eq!(
            extractor.extract_all("PayPal then Other"),
            vec![PaymentMethod::PayPal, PaymentMethod::Other]
        );
    }
}
