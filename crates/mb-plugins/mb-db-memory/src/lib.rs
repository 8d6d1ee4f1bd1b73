//! # mb-db-memory
//!
//! In-process implementation of `ListingRepo` and `BookingRepo`.
//! Runs the site without a database and serves as the fake storage in tests.
//! The catalog is fixed at construction; bookings live in a concurrent map.

use std::path::Path;

use async_trait::async_trait;
use bson::oid::ObjectId;
use dashmap::DashMap;
use mb_core::error::{AppError, Result};
use mb_core::filter::ListingFilter;
use mb_core::models::{Booking, Listing};
use mb_core::traits::{BookingRepo, ListingRepo};
use serde::Deserialize;
use tracing::{debug, info};

/// Read-only catalog kept in seed order.
pub struct MemoryListingRepo {
    listings: Vec<Listing>,
}

impl MemoryListingRepo {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Parses a JSON array of documents laid out like the MongoDB catalog
    /// (`_id`, `address.street`, `images.picture_url`, ...).
    pub fn from_json(json: &str) -> Result<Self> {
        let documents: Vec<SeedListing> = serde_json::from_str(json)
            .map_err(|e| AppError::StorageUnavailable(format!("invalid seed data: {e}")))?;

        Ok(Self::new(documents.into_iter().map(Listing::from).collect()))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::StorageUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;

        let repo = Self::from_json(&json)?;
        info!("Seeded {} listings from {}", repo.len(), path.display());
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait]
impl ListingRepo for MemoryListingRepo {
    async fn find(&self, filter: ListingFilter, limit: usize) -> Result<Vec<Listing>> {
        Ok(self
            .listings
            .iter()
            .filter(|listing| filter.matches(listing))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Listing>> {
        Ok(self.listings.iter().find(|listing| listing.id == id).cloned())
    }
}

/// Bookings keyed by their generated id.
#[derive(Default)]
pub struct MemoryBookingRepo {
    bookings: DashMap<String, Booking>,
}

impl MemoryBookingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every booking currently held for `property`.
    pub fn bookings_for(&self, property: &str) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|entry| entry.property == property)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[async_trait]
impl BookingRepo for MemoryBookingRepo {
    async fn create(&self, property: &str) -> Result<Booking> {
        let booking = Booking {
            id: ObjectId::new().to_hex(),
            property: property.to_string(),
        };
        self.bookings.insert(booking.id.clone(), booking.clone());
        debug!(booking_id = %booking.id, property, "Stored booking");
        Ok(booking)
    }

    async fn cancel(&self, booking_id: &str) -> Result<Option<Booking>> {
        Ok(self.bookings.remove(booking_id).map(|(_, booking)| booking))
    }
}

#[derive(Deserialize)]
struct SeedListing {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    summary: String,
    address: SeedAddress,
    price: f64,
    #[serde(default)]
    cleaning_fee: Option<f64>,
    accommodates: i64,
    images: SeedImages,
    amenities: Vec<String>,
    #[serde(default)]
    review_scores: Option<SeedReviewScores>,
}

#[derive(Deserialize)]
struct SeedAddress {
    street: String,
}

#[derive(Deserialize)]
struct SeedImages {
    picture_url: String,
}

#[derive(Deserialize)]
struct SeedReviewScores {
    #[serde(default)]
    review_scores_rating: Option<f64>,
}

impl From<SeedListing> for Listing {
    fn from(seed: SeedListing) -> Self {
        Listing {
            id: seed.id,
            name: seed.name,
            summary: seed.summary,
            street: seed.address.street,
            price: seed.price,
            cleaning_fee: seed.cleaning_fee,
            accommodates: seed.accommodates,
            picture_url: seed.images.picture_url,
            amenities: seed.amenities,
            rating: seed.review_scores.and_then(|r| r.review_scores_rating),
        }
    }
}
