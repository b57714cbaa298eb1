use anyhow::Context;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::message::{
    self, GENERIC_CREATE, GENERIC_LOOKUP, GENERIC_MUNICIPALITIES, GENERIC_STAFF_LIST,
    GENERIC_UPDATE,
};
use super::BookingApi;
use crate::errors::BookingError;
use crate::models::{Booking, BookingDraft, BookingId};

pub struct HttpBookingClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpBookingClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid booking service url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "booking service url cannot carry a path: {base_url}"
        );
        Ok(Self { base_url, client })
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> Option<Response> {
        match request.send().await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(error = %e, "{operation}: request failed");
                None
            }
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, operation: &str) -> Option<T> {
    match response.json::<T>().await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "{operation}: failed to parse response");
            None
        }
    }
}

#[async_trait]
impl BookingApi for HttpBookingClient {
    async fn list_municipalities(&self) -> Result<Vec<String>, BookingError> {
        let failed = || BookingError::Load(GENERIC_MUNICIPALITIES.to_string());
        let url = self.endpoint(&["api", "bookings", "municipalities"]);

        let response = self
            .send(self.client.get(url), "list municipalities")
            .await
            .ok_or_else(failed)?;

        if !response.status().is_success() {
            let msg = message::error_message(response, GENERIC_MUNICIPALITIES).await;
            return Err(BookingError::Load(msg));
        }

        read_json(response, "list municipalities")
            .await
            .ok_or_else(failed)
    }

    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking, BookingError> {
        let failed = || BookingError::Validation(GENERIC_CREATE.to_string());
        let url = self.endpoint(&["api", "bookings"]);

        let response = self
            .send(self.client.post(url).json(draft), "create booking")
            .await
            .ok_or_else(failed)?;

        let status = response.status();
        if !status.is_success() {
            let msg = message::error_message(response, GENERIC_CREATE).await;
            tracing::warn!(%status, "booking rejected: {msg}");
            return Err(BookingError::Validation(msg));
        }

        read_json(response, "create booking").await.ok_or_else(failed)
    }

    async fn lookup_by_token(&self, token: &str) -> Result<Booking, BookingError> {
        let failed = || BookingError::Load(GENERIC_LOOKUP.to_string());
        let url = self.endpoint(&["api", "bookings", "token", token]);

        let response = self
            .send(self.client.get(url), "lookup booking")
            .await
            .ok_or_else(failed)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BookingError::NotFound {
                token: token.to_string(),
            }),
            status if !status.is_success() => {
                let msg = message::error_message(response, GENERIC_LOOKUP).await;
                Err(BookingError::Load(msg))
            }
            _ => read_json(response, "lookup booking").await.ok_or_else(failed),
        }
    }

    async fn list_for_municipality(&self, municipality: &str) -> Result<Vec<Booking>, BookingError> {
        let failed = || BookingError::Load(GENERIC_STAFF_LIST.to_string());
        let url = self.endpoint(&["api", "bookings", "staff", municipality]);

        let response = self
            .send(self.client.get(url), "list bookings")
            .await
            .ok_or_else(failed)?;

        if !response.status().is_success() {
            let msg = message::error_message(response, GENERIC_STAFF_LIST).await;
            return Err(BookingError::Load(msg));
        }

        // Anything other than an array counts as "no bookings"; only an
        // unreadable body or a malformed entry is a failure.
        let data: serde_json::Value = read_json(response, "list bookings")
            .await
            .ok_or_else(failed)?;
        match data {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value::<Booking>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    tracing::warn!(error = %e, "list bookings: malformed booking entry");
                    failed()
                }),
            other => {
                tracing::warn!("list bookings: expected an array, got {other}");
                Ok(Vec::new())
            }
        }
    }

    async fn update_status(&self, booking_id: &BookingId, status: &str) -> Result<Booking, BookingError> {
        let failed = || BookingError::Update(GENERIC_UPDATE.to_string());
        let url = self.endpoint(&["api", "bookings", "staff", booking_id.as_str(), "status"]);

        let response = self
            .send(
                self.client.patch(url).json(&json!({ "status": status })),
                "update status",
            )
            .await
            .ok_or_else(failed)?;

        let http_status = response.status();
        if !http_status.is_success() {
            let msg = message::error_message(response, GENERIC_UPDATE).await;
            tracing::warn!(status = %http_status, booking_id = %booking_id, "status update rejected: {msg}");
            return Err(BookingError::Update(msg));
        }

        read_json(response, "update status").await.ok_or_else(failed)
    }
}
