//! Staff console: bookings of one municipality at a time, with per-row
//! status updates.
//!
//! The row table is rebuilt wholesale on every municipality selection. Each
//! selection bumps a generation counter; responses that come back for an
//! older generation are dropped without touching the current rows. A row
//! accepts at most one update at a time: while its request is in flight the
//! row is flagged and its controls are disabled.
//!
//! Round trips run on their own tasks. Dropping the future returned by
//! `select_municipality` or `trigger_update` does not cancel the request;
//! the task still settles the table or the row when the response arrives.

pub mod table;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::client::message::{GENERIC_STAFF_LIST, GENERIC_UPDATE};
use crate::client::BookingApi;
use crate::errors::BookingError;
use crate::models::{Booking, BookingId};
use crate::services::status_policy;

pub use table::{MunicipalityOptions, Placeholder, RowBinding, TableState, UpdateControl, UpdatedMarker};

pub const INVALID_ID_MESSAGE: &str = "Identificador do agendamento inválido.";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    TableReplaced { municipality: Option<String> },
    RowUpdated { booking_id: BookingId, status: Option<String> },
    Alert(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The row now shows the booking as persisted by the backend.
    Applied(Booking),
    Failed(BookingError),
    /// The row already had an update in flight.
    Ignored,
    /// No row with this id in the current table.
    NoSuchRow,
    /// The table was replaced while the request was in flight.
    Detached,
    InvalidId,
}

struct ConsoleView {
    municipalities: MunicipalityOptions,
    generation: u64,
    table: TableState,
}

#[derive(Clone)]
pub struct StaffConsole {
    api: Arc<dyn BookingApi>,
    view: Arc<Mutex<ConsoleView>>,
    events: broadcast::Sender<ConsoleEvent>,
}

impl StaffConsole {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            api,
            view: Arc::new(Mutex::new(ConsoleView {
                municipalities: MunicipalityOptions::default(),
                generation: 0,
                table: TableState::Idle,
            })),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    pub fn table(&self) -> TableState {
        self.view().table.clone()
    }

    pub fn row(&self, booking_id: &BookingId) -> Option<RowBinding> {
        self.view().table.row(booking_id).cloned()
    }

    pub fn municipality_options(&self) -> MunicipalityOptions {
        self.view().municipalities.clone()
    }

    /// Fills the municipality selector. On failure the list is empty and the
    /// options are marked failed.
    pub async fn load_municipalities(&self) -> MunicipalityOptions {
        let options = match self.api.list_municipalities().await {
            Ok(names) => MunicipalityOptions::Loaded(names),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load municipalities");
                MunicipalityOptions::Failed
            }
        };
        self.view().municipalities = options.clone();
        options
    }

    /// Clears the table and, for a non-empty selection, loads its bookings.
    /// Returns the table as it stands once this selection settles.
    pub async fn select_municipality(&self, municipality: Option<&str>) -> TableState {
        let municipality = municipality.filter(|m| !m.is_empty());

        let generation = {
            let mut view = self.view();
            view.generation += 1;
            view.table = match municipality {
                Some(m) => TableState::Loading {
                    municipality: m.to_string(),
                },
                None => TableState::Idle,
            };
            view.generation
        };
        self.notify(ConsoleEvent::TableReplaced {
            municipality: municipality.map(str::to_string),
        });

        let Some(municipality) = municipality else {
            return TableState::Idle;
        };

        let console = self.clone();
        let name = municipality.to_string();
        let load = tokio::spawn(async move {
            let result = console.api.list_for_municipality(&name).await;
            console.finish_load(&name, generation, result)
        });

        match load.await {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(municipality, error = %e, "bookings load task failed");
                self.finish_load(
                    municipality,
                    generation,
                    Err(BookingError::Load(GENERIC_STAFF_LIST.to_string())),
                )
            }
        }
    }

    fn finish_load(
        &self,
        municipality: &str,
        generation: u64,
        result: Result<Vec<Booking>, BookingError>,
    ) -> TableState {
        let table = {
            let mut view = self.view();
            if view.generation != generation {
                tracing::debug!(municipality, "discarding bookings for a superseded selection");
                return view.table.clone();
            }

            view.table = match result {
                Ok(bookings) if bookings.is_empty() => TableState::Empty {
                    municipality: municipality.to_string(),
                },
                Ok(bookings) => {
                    tracing::info!(municipality, "loaded {} bookings", bookings.len());
                    TableState::Populated {
                        municipality: municipality.to_string(),
                        rows: bookings.into_iter().map(RowBinding::new).collect(),
                    }
                }
                Err(e) => {
                    tracing::warn!(municipality, error = %e, "failed to load bookings");
                    TableState::Failed {
                        municipality: municipality.to_string(),
                        error: e.message(),
                    }
                }
            };
            view.table.clone()
        };
        self.notify(ConsoleEvent::TableReplaced {
            municipality: Some(municipality.to_string()),
        });
        table
    }

    /// Changes a row's pending selector value. Refused while the row's
    /// controls are disabled or for a value outside the enumeration.
    pub fn select_status(&self, booking_id: &BookingId, value: &str) -> bool {
        if !status_policy::is_known(value) {
            return false;
        }
        let mut view = self.view();
        match view.table.row_mut(booking_id) {
            Some(row) if row.selector_enabled => {
                row.selected_status = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Sends the row's selected status to the backend.
    pub async fn trigger_update(&self, booking_id: &BookingId) -> UpdateOutcome {
        if booking_id.is_empty() {
            self.notify(ConsoleEvent::Alert(INVALID_ID_MESSAGE.to_string()));
            return UpdateOutcome::InvalidId;
        }

        let (generation, requested) = {
            let mut guard = self.view();
            let view = &mut *guard;
            let Some(row) = view.table.row_mut(booking_id) else {
                return UpdateOutcome::NoSuchRow;
            };
            if row.in_flight || !row.control.enabled {
                return UpdateOutcome::Ignored;
            }
            row.begin_update();
            (view.generation, row.selected_status.clone())
        };

        let console = self.clone();
        let id = booking_id.clone();
        let update = tokio::spawn(async move {
            let result = console.api.update_status(&id, &requested).await;
            console.finish_update(&id, generation, result)
        });

        match update.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(booking_id = %booking_id, error = %e, "status update task failed");
                self.finish_update(
                    booking_id,
                    generation,
                    Err(BookingError::Update(GENERIC_UPDATE.to_string())),
                )
            }
        }
    }

    // Runs once per dispatched update, whichever way the request went.
    fn finish_update(
        &self,
        booking_id: &BookingId,
        generation: u64,
        result: Result<Booking, BookingError>,
    ) -> UpdateOutcome {
        let mut guard = self.view();
        let view = &mut *guard;
        let row = match view.table.row_mut(booking_id) {
            Some(row) if view.generation == generation => row,
            _ => {
                tracing::debug!(booking_id = %booking_id, "dropping update response for a detached row");
                return UpdateOutcome::Detached;
            }
        };

        let outcome = match result {
            Ok(booking) => {
                row.apply_server_booking(booking.clone());
                self.notify(ConsoleEvent::RowUpdated {
                    booking_id: booking_id.clone(),
                    status: booking.status.clone(),
                });
                UpdateOutcome::Applied(booking)
            }
            Err(e) => {
                self.notify(ConsoleEvent::Alert(e.message()));
                UpdateOutcome::Failed(e)
            }
        };
        row.end_update();
        outcome
    }

    fn notify(&self, event: ConsoleEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn view(&self) -> MutexGuard<'_, ConsoleView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
