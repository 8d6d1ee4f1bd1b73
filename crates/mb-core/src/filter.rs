//! # Listing selectors
//!
//! The four named policies the home grid can be filtered by. Storage plugins
//! either translate a selector into a native query or evaluate
//! [`ListingFilter::matches`] directly; both must agree.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::Listing;

/// Upper bound on the number of listings any selector returns.
pub const RESULT_LIMIT: usize = 15;

/// Exclusive nightly price ceiling for `under-100` and `highly-rated`.
pub const PRICE_CEILING: f64 = 100.0;

/// Exclusive rating floor for `highly-rated`.
pub const RATING_FLOOR: f64 = 90.0;

/// A listing qualifies for `surprise` if it offers at least one of these.
pub const SURPRISE_AMENITIES: [&str; 3] = ["Pets allowed", "Patio or balcony", "Self check-in"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingFilter {
    /// Any listing with a cleaning fee
    #[default]
    Featured,
    UnderHundred,
    HighlyRated,
    Surprise,
}

impl ListingFilter {
    pub const ALL: [ListingFilter; 4] = [
        ListingFilter::Featured,
        ListingFilter::UnderHundred,
        ListingFilter::HighlyRated,
        ListingFilter::Surprise,
    ];

    /// Resolves the raw `filter` query parameter.
    ///
    /// Absent and empty values select [`ListingFilter::Featured`]; anything
    /// else that is not a known selector is rejected.
    pub fn from_query(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Featured),
            Some(value) => value.parse(),
        }
    }

    /// Value carried in the query string. `None` for the default selector.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::Featured => None,
            Self::UnderHundred => Some("under-100"),
            Self::HighlyRated => Some("highly-rated"),
            Self::Surprise => Some("surprise"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::UnderHundred => "Under $100",
            Self::HighlyRated => "Highly rated",
            Self::Surprise => "Surprise me",
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if listing.cleaning_fee.is_none() {
            return false;
        }

        match self {
            Self::Featured => true,
            Self::UnderHundred => listing.price < PRICE_CEILING,
            Self::HighlyRated => {
                listing.price < PRICE_CEILING
                    && listing.rating.is_some_and(|rating| rating > RATING_FLOOR)
            }
            Self::Surprise => SURPRISE_AMENITIES.iter().any(|a| listing.has_amenity(a)),
        }
    }
}

impl FromStr for ListingFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "under-100" => Ok(Self::UnderHundred),
            "highly-rated" => Ok(Self::HighlyRated),
            "surprise" => Ok(Self::Surprise),
            other => Err(AppError::UnrecognizedFilter(other.to_string())),
        }
    }
}

impl fmt::Display for ListingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value().unwrap_or("featured"))
    }
}
