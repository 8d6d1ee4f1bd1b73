//! Translation of listing selectors and ids into MongoDB query documents.
//! Must accept exactly what `ListingFilter::matches` accepts.

use mb_core::filter::{ListingFilter, PRICE_CEILING, RATING_FLOOR, SURPRISE_AMENITIES};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};

pub fn listing_query(filter: ListingFilter) -> Document {
    let mut query = doc! { "cleaning_fee": { "$exists": true, "$ne": null } };

    match filter {
        ListingFilter::Featured => {}
        ListingFilter::UnderHundred => {
            query.insert("price", doc! { "$lt": PRICE_CEILING });
        }
        ListingFilter::HighlyRated => {
            query.insert("price", doc! { "$lt": PRICE_CEILING });
            query.insert(
                "review_scores.review_scores_rating",
                doc! { "$gt": RATING_FLOOR },
            );
        }
        ListingFilter::Surprise => {
            query.insert("amenities", doc! { "$in": SURPRISE_AMENITIES.to_vec() });
        }
    }

    query
}

/// Matches `_id` as stored text and, when `id` is ObjectId hex, as an ObjectId.
pub fn id_query(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": { "$in": [id, oid] } },
        Err(_) => doc! { "_id": id },
    }
}
