use std::sync::Arc;

use crate::client::BookingApi;
use crate::errors::BookingError;
use crate::models::{or_placeholder, Booking, BookingDraft};
use crate::services::status_policy;

pub const MUNICIPALITIES_UNAVAILABLE: &str = "Não foi possível carregar";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionView {
    Accepted { token: String, message: String },
    /// The draft is handed back so the form keeps what the citizen typed.
    Rejected { message: String, draft: BookingDraft },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    pub municipality: String,
    pub item_description: String,
    pub booking_date: String,
    pub time_slot: String,
    pub status: String,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            municipality: or_placeholder(booking.municipality.as_deref()),
            item_description: or_placeholder(booking.item_description.as_deref()),
            booking_date: or_placeholder(booking.booking_date.as_deref()),
            time_slot: or_placeholder(booking.time_slot.as_deref()),
            status: status_policy::label_for(booking.status.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupView {
    Found(BookingSummary),
    NotFound(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MunicipalityChoices {
    Available(Vec<String>),
    Unavailable(&'static str),
}

/// Citizen-side flows: one request per user action, nothing kept between
/// calls.
pub struct CitizenPortal {
    api: Arc<dyn BookingApi>,
}

impl CitizenPortal {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self { api }
    }

    pub async fn load_municipalities(&self) -> MunicipalityChoices {
        match self.api.list_municipalities().await {
            Ok(names) => MunicipalityChoices::Available(names),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load municipalities");
                MunicipalityChoices::Unavailable(MUNICIPALITIES_UNAVAILABLE)
            }
        }
    }

    pub async fn submit(&self, draft: BookingDraft) -> SubmissionView {
        match self.api.create_booking(&draft).await {
            Ok(booking) => {
                let token = or_placeholder(booking.booking_token.as_deref());
                SubmissionView::Accepted {
                    message: format!("Agendamento realizado com sucesso! Guarde o seu código de consulta: {token}"),
                    token,
                }
            }
            Err(e) => SubmissionView::Rejected {
                message: e.message(),
                draft,
            },
        }
    }

    /// Returns `None` without contacting the backend when the token is blank.
    pub async fn lookup(&self, token: &str) -> Option<LookupView> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        Some(match self.api.lookup_by_token(token).await {
            Ok(booking) => LookupView::Found(BookingSummary::from(&booking)),
            Err(e @ BookingError::NotFound { .. }) => LookupView::NotFound(e.message()),
            Err(e) => LookupView::Failed(e.message()),
        })
    }
}
