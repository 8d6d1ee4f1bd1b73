//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::filter::ListingFilter;
use crate::models::{Booking, BookingEvent, Listing};

/// Read-only access to the listing catalog.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ListingRepo: Send + Sync {
    /// Returns at most `limit` listings accepted by `filter`, in storage order.
    async fn find(&self, filter: ListingFilter, limit: usize) -> Result<Vec<Listing>>;

    /// Looks up exactly one listing. `Ok(None)` on a miss.
    async fn get(&self, id: &str) -> Result<Option<Listing>>;
}

/// Persistence contract for bookings.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait BookingRepo: Send + Sync {
    /// Inserts a new booking for `property`. Every call creates a new record.
    async fn create(&self, property: &str) -> Result<Booking>;

    /// Deletes a booking, returning it if it existed.
    async fn cancel(&self, booking_id: &str) -> Result<Option<Booking>>;
}

/// Delivery of booking events to external automation.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn publish(&self, event: &BookingEvent) -> Result<()>;
}
