//! mongobnb/crates/mb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for mongobnb.

pub mod error;
pub mod filter;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use filter::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    fn cabin() -> Listing {
        Listing {
            id: "L1".to_string(),
            name: "Cabin".to_string(),
            summary: "Cozy".to_string(),
            street: "1 Pine Rd".to_string(),
            price: 80.0,
            cleaning_fee: Some(20.0),
            accommodates: 4,
            picture_url: "http://x/img.jpg".to_string(),
            amenities: vec!["Pets allowed".to_string()],
            rating: None,
        }
    }

    #[test]
    fn test_view_coerces_numbers_to_text() {
        let view = PropertyView::from(&cabin());
        assert_eq!(view.price, "80.00");
        assert_eq!(view.cleaning_fee.as_deref(), Some("20.00"));
        assert_eq!(view.accommodates, "4");
        assert_eq!(view.amenities, vec!["Pets allowed"]);
    }

    #[test]
    fn test_view_keeps_missing_fee_absent() {
        let listing = Listing { cleaning_fee: None, ..cabin() };
        assert_eq!(PropertyView::from(listing).cleaning_fee, None);
    }

    #[test]
    fn test_event_serializes_with_dotted_kind() {
        let booking = Booking { id: "b1".into(), property: "L1".into() };
        let json = serde_json::to_value(BookingEvent::created(&booking)).unwrap();
        assert_eq!(json["event"], "booking.created");
        assert_eq!(json["booking_id"], "b1");
        assert_eq!(json["property"], "L1");

        let json = serde_json::to_value(BookingEvent::cancelled(&booking)).unwrap();
        assert_eq!(json["event"], "booking.cancelled");
    }
}
