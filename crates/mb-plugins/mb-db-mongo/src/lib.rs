//! # mb-db-mongo Implementation
//!
//! This module implements the storage ports on top of MongoDB. One `Client`
//! is created at startup; the driver pools connections internally and every
//! request borrows from that pool, so no state is shared between requests
//! beyond the driver's own.

pub mod query;
pub mod shape;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mb_core::error::{AppError, Result};
use mb_core::filter::ListingFilter;
use mb_core::models::{Booking, Listing};
use mb_core::traits::{BookingRepo, ListingRepo};
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use crate::query::{id_query, listing_query};
use crate::shape::{booking_from_document, id_text, listing_from_document};

const APP_NAME: &str = "mongobnb";

fn storage_error(e: mongodb::error::Error) -> AppError {
    AppError::StorageUnavailable(e.to_string())
}

/// Handle to the application database.
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await.map_err(storage_error)?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).map_err(storage_error)?;
        Ok(Self {
            database: client.database(database),
        })
    }

    /// Round-trips a `ping` so a bad URI fails at startup instead of on the
    /// first page load.
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(storage_error)?;
        info!("Connected to database {}", self.database.name());
        Ok(())
    }

    pub fn listings(&self, collection: &str) -> MongoListingRepo {
        MongoListingRepo {
            collection: self.database.collection(collection),
        }
    }

    pub fn bookings(&self, collection: &str) -> MongoBookingRepo {
        MongoBookingRepo {
            collection: self.database.collection(collection),
        }
    }
}

pub struct MongoListingRepo {
    collection: Collection<Document>,
}

#[async_trait]
impl ListingRepo for MongoListingRepo {
    /// No sort is applied: results come back in the collection's natural order.
    async fn find(&self, filter: ListingFilter, limit: usize) -> Result<Vec<Listing>> {
        let query = listing_query(filter);
        debug!(%filter, ?query, limit, "Querying listings");

        let documents: Vec<Document> = self
            .collection
            .find(query)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await
            .map_err(storage_error)?
            .try_collect()
            .await
            .map_err(storage_error)?;

        documents.iter().map(listing_from_document).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Listing>> {
        self.collection
            .find_one(id_query(id))
            .await
            .map_err(storage_error)?
            .as_ref()
            .map(listing_from_document)
            .transpose()
    }
}

pub struct MongoBookingRepo {
    collection: Collection<Document>,
}

#[async_trait]
impl BookingRepo for MongoBookingRepo {
    async fn create(&self, property: &str) -> Result<Booking> {
        let inserted = self
            .collection
            .insert_one(doc! { "property": property })
            .await
            .map_err(storage_error)?;

        let id = id_text(&inserted.inserted_id)
            .ok_or_else(|| AppError::malformed(inserted.inserted_id.to_string(), "_id"))?;

        Ok(Booking {
            id,
            property: property.to_string(),
        })
    }

    async fn cancel(&self, booking_id: &str) -> Result<Option<Booking>> {
        self.collection
            .find_one_and_delete(id_query(booking_id))
            .await
            .map_err(storage_error)?
            .as_ref()
            .map(booking_from_document)
            .transpose()
    }
}
