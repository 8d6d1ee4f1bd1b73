//! # mb-notify-webhook
//!
//! Outbound side of the booking automation. Each booking event is POSTed as
//! JSON to a single configured URL; whatever listens there (an SMS relay, a
//! serverless function) decides what to do with it.

use std::time::Duration;

use async_trait::async_trait;
use mb_core::error::{AppError, Result};
use mb_core::models::BookingEvent;
use mb_core::traits::BookingNotifier;
use tracing::{debug, info};

pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mongobnb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Notification(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl BookingNotifier for WebhookNotifier {
    async fn publish(&self, event: &BookingEvent) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification(format!(
                "{} responded with {status}",
                self.url
            )));
        }

        debug!(booking_id = %event.booking_id, %status, "Delivered booking event");
        Ok(())
    }
}

/// Used when no webhook is configured: events only reach the log.
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn publish(&self, event: &BookingEvent) -> Result<()> {
        info!(
            event = ?event.event,
            booking_id = %event.booking_id,
            property = %event.property,
            "Booking event (no webhook configured)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use mb_core::models::Booking;
    use serde_json::Value;
    use tokio::net::TcpListener;

    use super::*;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn_receiver() -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route(
                "/hook",
                post(|State(seen): State<Received>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    StatusCode::NO_CONTENT
                }),
            )
            .route("/broken", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .with_state(received.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        (format!("http://{address}"), received)
    }

    fn booking() -> Booking {
        Booking {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".into(),
            property: "L1".into(),
        }
    }

    #[tokio::test]
    async fn test_posts_event_as_json() {
        let (base, received) = spawn_receiver().await;
        let notifier = WebhookNotifier::new(format!("{base}/hook"), Duration::from_secs(2)).unwrap();

        notifier.publish(&BookingEvent::created(&booking())).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["event"], "booking.created");
        assert_eq!(received[0]["booking_id"], "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(received[0]["property"], "L1");
    }

    #[tokio::test]
    async fn test_error_status_is_a_notification_failure() {
        let (base, _) = spawn_receiver().await;
        let notifier = WebhookNotifier::new(format!("{base}/broken"), Duration::from_secs(2)).unwrap();

        let err = notifier
            .publish(&BookingEvent::cancelled(&booking()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Notification(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_notification_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let notifier =
            WebhookNotifier::new(format!("http://{address}/hook"), Duration::from_secs(2)).unwrap();
        let err = notifier
            .publish(&BookingEvent::created(&booking()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Notification(_)));
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        LogNotifier
            .publish(&BookingEvent::created(&booking()))
            .await
            .unwrap();
    }
}
