//! Record normalization and de-duplication.

use crate::models::{Product, Review, Testimonial};

/// A scraped record that can be appended to a collection.
pub trait Record {
    /// Uniqueness key, `None` for records that are always appended.
    fn dedup_key(&self) -> Option<&str> {
        None
    }
}

impl Record for Product {
    fn dedup_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Record for Review {}

impl Record for Testimonial {}

/// Append `candidate` unless a record with the same key is already present.
///
/// The first record seen for a key wins; later duplicates are dropped without
/// touching the stored one. Returns whether the candidate was appended.
pub fn insert<T: Record>(records: &mut Vec<T>, candidate: T) -> bool {
    if let Some(key) = candidate.dedup_key() {
        if records.iter().any(|r| r.dedup_key() == Some(key)) {
            return false;
        }
    }
    records.push(candidate);
    true
}

/// Insert every candidate in order, returning how many were appended.
pub fn insert_all<T: Record>(records: &mut Vec<T>, candidates: impl IntoIterator<Item = T>) -> usize {
    candidates
        .into_iter()
        .filter_map(|c| insert(records, c).then_some(()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_product_wins() {
        let mut products = Vec::new();
        assert!(insert(&mut products, Product::new("Box", "$1")));
        assert!(!insert(&mut products, Product::new("Box", "$2")));
        assert!(insert(&mut products, Product::new("Bag", "$3")));

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, "$1");
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut products = vec![Product::new("Box", "$1")];
        let before = products.clone();
        assert!(!insert(&mut products, Product::new("Box", "$1")));
        assert_eq!(products, before);
    }

    #[test]
    fn test_reviews_always_append() {
        let mut reviews = Vec::new();
        let review = Review::from_text("2023-01-01\nSame");
        assert!(insert(&mut reviews, review.clone()));
        assert!(insert(&mut reviews, review));
        assert_eq!(reviews.len(), 2);
    }

    #[test]
    fn test_insert_all_counts_appended() {
        let mut products = vec![Product::new("A", "$1")];
        let added = insert_all(
            &mut products,
            vec![
                Product::new("A", "$9"),
                Product::new("B", "$2"),
                Product::new("B", "$3"),
            ],
        );
        assert_eq!(added, 1);
        assert_eq!(products.len(), 2);
    }
}
