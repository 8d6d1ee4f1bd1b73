//! # Domain Models
//!
//! These structs represent the core entities of mongobnb.
//! Listings come from a read-only external catalog; bookings are the only
//! records this application writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A property available for booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Opaque catalog identifier (string `_id`, or ObjectId hex)
    pub id: String,
    pub name: String,
    pub summary: String,
    pub street: String,
    /// Nightly price
    pub price: f64,
    /// Absent for part of the catalog; such listings never reach the home grid
    pub cleaning_fee: Option<f64>,
    /// Guest capacity
    pub accommodates: i64,
    pub picture_url: String,
    pub amenities: Vec<String>,
    /// `review_scores.review_scores_rating`, 0-100
    pub rating: Option<f64>,
}

impl Listing {
    pub fn has_amenity(&self, label: &str) -> bool {
        self.amenities.iter().any(|a| a == label)
    }
}

/// A reservation. Its existence is the "booked" state; deletion cancels it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Assigned by the database on insert
    pub id: String,
    /// Identifier of the booked listing. Never checked against the catalog.
    pub property: String,
}

/// Rendering-ready, string-coerced projection of a [`Listing`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyView {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub street: String,
    pub price: String,
    pub cleaning_fee: Option<String>,
    pub accommodates: String,
    pub picture_url: String,
    pub amenities: Vec<String>,
}

impl From<&Listing> for PropertyView {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            name: listing.name.clone(),
            summary: listing.summary.clone(),
            street: listing.street.clone(),
            price: format_amount(listing.price),
            cleaning_fee: listing.cleaning_fee.map(format_amount),
            accommodates: listing.accommodates.to_string(),
            picture_url: listing.picture_url.clone(),
            amenities: listing.amenities.clone(),
        }
    }
}

impl From<Listing> for PropertyView {
    fn from(listing: Listing) -> Self {
        Self::from(&listing)
    }
}

fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEventKind {
    #[serde(rename = "booking.created")]
    Created,
    #[serde(rename = "booking.cancelled")]
    Cancelled,
}

/// Emitted to external automation whenever the booking collection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub event: BookingEventKind,
    pub booking_id: String,
    pub property: String,
    pub occurred_at: DateTime<Utc>,
}

impl BookingEvent {
    pub fn created(booking: &Booking) -> Self {
        Self::new(BookingEventKind::Created, booking)
    }

    pub fn cancelled(booking: &Booking) -> Self {
        Self::new(BookingEventKind::Cancelled, booking)
    }

    fn new(event: BookingEventKind, booking: &Booking) -> Self {
        Self {
            event,
            booking_id: booking.id.clone(),
            property: booking.property.clone(),
            occurred_at: Utc::now(),
        }
    }
}
