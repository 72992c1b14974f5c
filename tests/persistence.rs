//! Saving and loading the document on disk.

use serde::ser::{Error as _, Serialize, Serializer};
use tempfile::tempdir;

use storescrape::models::{Document, Product, Review, SentimentAnnotation, SentimentLabel, Testimonial};
use storescrape::storage::{self, DocumentVariant, StorageError};

fn sample() -> Document {
    let mut review = Review::new("2023-02-10", "Čudovito, hvala!");
    review.annotate(SentimentAnnotation::new(SentimentLabel::Positive, 0.9987654321));
    Document {
        products: vec![Product::new("Box of Chocolate", "$24.99")],
        reviews: vec![review, Review::new("N/A", "plain")],
        testimonials: vec![Testimonial::from_captured("Great...")],
    }
}

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("refusing to serialize"))
    }
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("data.json");

    let doc = sample();
    storage::save(&doc, &path).unwrap();
    assert_eq!(storage::load(&path).unwrap(), doc);

    // Non-ASCII text is written as-is, not escaped.
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("Čudovito"));
}

#[test]
fn test_failed_serialization_keeps_old_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    storage::save(&sample(), &path).unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = storage::write_json(&Unserializable, &path).unwrap_err();
    assert!(matches!(err, StorageError::Serialize(_)));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_parent_is_a_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let err = storage::save(&sample(), &blocker.join("data.json")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn test_fallback_to_unannotated() {
    let dir = tempdir().unwrap();
    let annotated = dir.path().join("data_annotated.json");
    let unannotated = dir.path().join("data.json");

    let err = storage::load_preferred(&annotated, &unannotated).unwrap_err();
    assert!(err.is_not_found());

    storage::save(&sample(), &unannotated).unwrap();
    let loaded = storage::load_preferred(&annotated, &unannotated).unwrap();
    assert_eq!(loaded.variant, DocumentVariant::Unannotated);
    assert_eq!(loaded.path, unannotated);
}
