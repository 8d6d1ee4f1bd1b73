//! # mb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Form, Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};
use mb_core::filter::{ListingFilter, RESULT_LIMIT};
use mb_core::models::{BookingEvent, PropertyView};
use mb_core::traits::{BookingNotifier, BookingRepo, ListingRepo};
use mb_core::AppError;
use mb_ui::{
    filter_links, render, ConfirmationTemplate, IndexTemplate, ListingTemplate, SmsReplyTemplate,
    SITE_TITLE,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;

/// Storage and notification ports, injected once and shared by all requests.
pub struct AppState {
    pub listings: Arc<dyn ListingRepo>,
    pub bookings: Arc<dyn BookingRepo>,
    pub notifier: Arc<dyn BookingNotifier>,
}

pub type SharedState = Arc<AppState>;

type HtmlResult = Result<Html<String>, ApiError>;

const SMS_USAGE: &str = "Reply with your booking number to cancel a booking.";

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub filter: Option<String>,
}

/// Renders the listing grid (`/`, `/?filter=...`).
#[instrument(skip(state))]
pub async fn home(
    State(state): State<SharedState>,
    uri: Uri,
    params: Result<Query<HomeParams>, QueryRejection>,
) -> HtmlResult {
    let Query(params) = params.map_err(|rejection| {
        debug!(%rejection, "Unreadable query string");
        AppError::UnrecognizedFilter(uri.query().unwrap_or_default().to_string())
    })?;
    let filter = ListingFilter::from_query(params.filter.as_deref())?;

    let views: Vec<PropertyView> = state
        .listings
        .find(filter, RESULT_LIMIT)
        .await?
        .iter()
        .map(PropertyView::from)
        .collect();
    debug!(%filter, count = views.len(), "Listings selected");

    let filters = filter_links(filter);
    let html = render(&IndexTemplate {
        title: SITE_TITLE,
        heading: filter.label(),
        filters: &filters,
        listings: &views,
    })?;

    Ok(Html(html))
}

/// Renders one listing (`/listing/{id}`).
#[instrument(skip(state))]
pub async fn listing(State(state): State<SharedState>, Path(id): Path<String>) -> HtmlResult {
    let listing = state
        .listings
        .get(&id)
        .await?
        .ok_or_else(|| AppError::listing_not_found(&id))?;

    let property = PropertyView::from(listing);
    let html = render(&ListingTemplate {
        title: SITE_TITLE,
        property: &property,
    })?;

    Ok(Html(html))
}

/// Books a listing and renders the confirmation (`/confirmation/{id}`).
///
/// Every call inserts a new booking. The listing id is not checked against
/// the catalog.
#[instrument(skip(state))]
pub async fn confirmation(State(state): State<SharedState>, Path(id): Path<String>) -> HtmlResult {
    let booking = state.bookings.create(&id).await?;
    info!(booking_id = %booking.id, property = %booking.property, "Booking created");

    publish(state.notifier.as_ref(), BookingEvent::created(&booking)).await;

    let html = render(&ConfirmationTemplate {
        title: SITE_TITLE,
        booking_id: &booking.id,
        listing_id: &booking.property,
    })?;

    Ok(Html(html))
}

/// Form fields posted by SMS gateways for an incoming message.
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
}

/// Cancels the booking named in an inbound text (`POST /webhooks/sms`) and
/// answers with the reply message for the sender.
#[instrument(skip(state, sms))]
pub async fn inbound_sms(
    State(state): State<SharedState>,
    Form(sms): Form<InboundSms>,
) -> Result<Response, ApiError> {
    let booking_id = sms.body.trim();
    debug!(from = ?sms.from, booking_id, "Inbound SMS");

    let message = if booking_id.is_empty() {
        SMS_USAGE.to_string()
    } else {
        match state.bookings.cancel(booking_id).await? {
            Some(booking) => {
                info!(booking_id = %booking.id, property = %booking.property, "Booking cancelled");
                publish(state.notifier.as_ref(), BookingEvent::cancelled(&booking)).await;
                format!("Booking {} has been cancelled.", booking.id)
            }
            None => format!("We could not find a booking with the number {booking_id}."),
        }
    };

    let xml = render(&SmsReplyTemplate { message: &message })?;
    Ok(([(CONTENT_TYPE, "application/xml")], xml).into_response())
}

pub async fn fallback(uri: Uri) -> ApiError {
    ApiError(AppError::NotFound("Page".to_string(), uri.path().to_string()))
}

/// The booking is already stored and cannot be rolled back, so delivery
/// failures are only logged.
async fn publish(notifier: &dyn BookingNotifier, event: BookingEvent) {
    if let Err(e) = notifier.publish(&event).await {
        warn!(booking_id = %event.booking_id, error = %e, "Booking event not delivered");
    }
}
