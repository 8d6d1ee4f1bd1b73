//! Validated extraction of domain models from raw catalog documents.
//!
//! The catalog is externally supplied, so nothing about a document is trusted:
//! a required field that is absent or of the wrong type becomes
//! `AppError::MalformedDocument` naming the dotted field path.

use mb_core::error::{AppError, Result};
use mb_core::models::{Booking, Listing};
use mongodb::bson::{Bson, Decimal128, Document};

const UNKNOWN_ID: &str = "<unknown>";

pub fn listing_from_document(doc: &Document) -> Result<Listing> {
    let id = doc
        .get("_id")
        .and_then(id_text)
        .ok_or_else(|| AppError::malformed(UNKNOWN_ID, "_id"))?;

    Ok(Listing {
        name: required_text(doc, &id, "name")?,
        summary: required_text(doc, &id, "summary")?,
        street: required_text(doc, &id, "address.street")?,
        price: required_number(doc, &id, "price")?,
        cleaning_fee: optional_number(doc, &id, "cleaning_fee")?,
        accommodates: required_integer(doc, &id, "accommodates")?,
        picture_url: required_text(doc, &id, "images.picture_url")?,
        amenities: text_list(doc, &id, "amenities")?,
        rating: optional_number(doc, &id, "review_scores.review_scores_rating")?,
        id,
    })
}

pub fn booking_from_document(doc: &Document) -> Result<Booking> {
    let id = doc
        .get("_id")
        .and_then(id_text)
        .ok_or_else(|| AppError::malformed(UNKNOWN_ID, "_id"))?;

    Ok(Booking {
        property: required_text(doc, &id, "property")?,
        id,
    })
}

/// Text form of a document identifier.
pub fn id_text(value: &Bson) -> Option<String> {
    match value {
        Bson::String(s) => Some(s.clone()),
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Follows a dotted path through nested documents.
fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;

    for segment in segments {
        match current {
            Bson::Document(inner) => current = inner.get(segment)?,
            _ => return None,
        }
    }

    Some(current)
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        Bson::Decimal128(d) => decimal_to_f64(d),
        _ => None,
    }
}

/// NaN and infinities never occur in prices and yield `None`.
fn decimal_to_f64(decimal: &Decimal128) -> Option<f64> {
    decimal
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn required_text(doc: &Document, id: &str, path: &str) -> Result<String> {
    match lookup(doc, path) {
        Some(Bson::String(s)) => Ok(s.clone()),
        _ => Err(AppError::malformed(id, path)),
    }
}

fn required_number(doc: &Document, id: &str, path: &str) -> Result<f64> {
    lookup(doc, path)
        .and_then(number)
        .ok_or_else(|| AppError::malformed(id, path))
}

fn optional_number(doc: &Document, id: &str, path: &str) -> Result<Option<f64>> {
    match lookup(doc, path) {
        None | Some(Bson::Null) => Ok(None),
        Some(value) => number(value)
            .map(Some)
            .ok_or_else(|| AppError::malformed(id, path)),
    }
}

fn required_integer(doc: &Document, id: &str, path: &str) -> Result<i64> {
    match lookup(doc, path) {
        Some(Bson::Int32(n)) => Ok(i64::from(*n)),
        Some(Bson::Int64(n)) => Ok(*n),
        Some(Bson::Double(n)) if n.fract() == 0.0 => Ok(*n as i64),
        _ => Err(AppError::malformed(id, path)),
    }
}

fn text_list(doc: &Document, id: &str, path: &str) -> Result<Vec<String>> {
    let Some(Bson::Array(items)) = lookup(doc, path) else {
        return Err(AppError::malformed(id, path));
    };

    items
        .iter()
        .map(|item| match item {
            Bson::String(s) => Ok(s.clone()),
            _ => Err(AppError::malformed(id, path)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;

    use super::*;

    fn decimal(text: &str) -> Decimal128 {
        text.parse().unwrap()
    }

    fn cabin() -> Document {
        doc! {
            "_id": "L1",
            "name": "Cabin",
            "summary": "Cozy",
            "address": { "street": "1 Pine Rd", "country": "US" },
            "price": 80,
            "cleaning_fee": 20,
            "accommodates": 4,
            "images": { "picture_url": "http://x/img.jpg" },
            "amenities": ["Pets allowed"],
        }
    }

    #[test]
    fn shapes_a_complete_document() {
        let listing = listing_from_document(&cabin()).unwrap();
        assert_eq!(listing.id, "L1");
        assert_eq!(listing.street, "1 Pine Rd");
        assert_eq!(listing.price, 80.0);
        assert_eq!(listing.cleaning_fee, Some(20.0));
        assert_eq!(listing.accommodates, 4);
        assert_eq!(listing.picture_url, "http://x/img.jpg");
        assert_eq!(listing.amenities, vec!["Pets allowed"]);
        assert_eq!(listing.rating, None);
    }

    #[test]
    fn reads_decimal128_prices_and_nested_rating() {
        let mut doc = cabin();
        doc.insert("price", decimal("79.50"));
        doc.insert("cleaning_fee", decimal("15.00"));
        doc.insert("review_scores", doc! { "review_scores_rating": 96 });

        let listing = listing_from_document(&doc).unwrap();
        assert_eq!(listing.price, 79.5);
        assert_eq!(listing.cleaning_fee, Some(15.0));
        assert_eq!(listing.rating, Some(96.0));
    }

    #[test]
    fn decodes_signed_and_scaled_decimals() {
        assert_eq!(decimal_to_f64(&decimal("125")), Some(125.0));
        assert_eq!(decimal_to_f64(&decimal("1.2E+3")), Some(1200.0));
        assert_eq!(decimal_to_f64(&decimal("0.001")), Some(0.001));
        assert_eq!(decimal_to_f64(&decimal("-12.25")), Some(-12.25));
    }

    #[test]
    fn missing_and_null_fee_are_absent() {
        let mut doc = cabin();
        doc.remove("cleaning_fee");
        assert_eq!(listing_from_document(&doc).unwrap().cleaning_fee, None);

        doc.insert("cleaning_fee", Bson::Null);
        assert_eq!(listing_from_document(&doc).unwrap().cleaning_fee, None);
    }

    #[test]
    fn missing_nested_field_is_malformed() {
        let mut doc = cabin();
        doc.insert("address", doc! { "country": "US" });
        assert_eq!(
            listing_from_document(&doc),
            Err(AppError::malformed("L1", "address.street"))
        );
    }

    #[test]
    fn wrongly_typed_field_is_malformed() {
        let mut doc = cabin();
        doc.insert("price", "eighty");
        assert_eq!(listing_from_document(&doc), Err(AppError::malformed("L1", "price")));

        let mut doc = cabin();
        doc.insert("amenities", vec![Bson::from("Wifi"), Bson::from(3)]);
        assert_eq!(
            listing_from_document(&doc),
            Err(AppError::malformed("L1", "amenities"))
        );
    }

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::new();
        let booking = booking_from_document(&doc! { "_id": oid, "property": "L1" }).unwrap();
        assert_eq!(booking.id, oid.to_hex());
        assert_eq!(booking.property, "L1");
    }

    #[test]
    fn document_without_id_is_malformed() {
        assert_eq!(
            booking_from_document(&doc! { "property": "L1" }),
            Err(AppError::malformed(UNKNOWN_ID, "_id"))
        );
    }
}
