//! Line item extraction. The only rule that yields many values.

use crate::models::record::OrderItem;

use super::patterns::ORDER_ITEM;
use super::FieldExtractor;

/// Order line extractor.
pub struct OrderItemExtractor;

impl OrderItemExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrderItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for OrderItemExtractor {
    type Output = OrderItem;

    fn extract(&self, text: &str) -> Option<OrderItem> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<OrderItem> {
        extract_order_details(text)
    }
}

/// Every non-overlapping "<qty> <description> $<price>" match, in text order.
/// Duplicates are kept.
pub fn extract_order_details(text: &str) -> Vec<OrderItem> {
    ORDER_ITEM
        .captures_iter(text)
        .map(|caps| OrderItem::new(caps[1].trim_end(), &caps[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_items_keep_text_order() {
        let items = extract_order_details("2 Salad $9.99\n1 Drink $2.50");
        assert_eq!(
            items,
            vec![
                OrderItem::new("2 Salad", "$9.99"),
                OrderItem::new("1 Drink", "$2.50"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let items = extract_order_details("1 Cookie $1.00\n1 Cookie $1.00");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }

    #[test]
    fn test_items_on_one_line() {
        let items = extract_order_details("2 Salad $9.99 1 Drink $2.50");
        assert_eq!(
            items,
            vec![
                OrderItem::new("2 Salad", "$9.99"),
                OrderItem::new("1 Drink", "$2.50"),
            ]
        );
    }

    #[test]
    fn test_lines_without_quantity_are_skipped() {
        let items = extract_order_details("Tax $0.50\n$5.00\nCoffee $4.50\n3/14/2024\n2 Coffee  $4.50");
        assert_eq!(items, vec![OrderItem::new("2 Coffee", "$4.50")]);
    }

    #[test]
    fn test_extractor_first() {
        assert_eq!(OrderItemExtractor::new().extract("no items"), None);
    }
}
