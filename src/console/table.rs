use crate::models::{or_placeholder, Booking, BookingId};
use crate::services::status_policy;

pub const UPDATE_LABEL: &str = "Atualizar";
pub const UPDATE_PENDING_LABEL: &str = "A atualizar...";
pub const EMPTY_MESSAGE: &str = "Não existem agendamentos para este município.";
pub const LOAD_FAILED_MESSAGE: &str = "Erro ao carregar dados.";
pub const MUNICIPALITIES_FAILED_MESSAGE: &str = "Erro ao carregar municípios";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for UpdateControl {
    fn default() -> Self {
        Self {
            enabled: true,
            label: UPDATE_LABEL,
        }
    }
}

/// The "updated" marker. Removing and re-adding it is recorded as a new
/// restart count; a renderer replays its transition whenever the count moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatedMarker {
    pub present: bool,
    pub restarts: u64,
}

impl UpdatedMarker {
    fn restart(&mut self) {
        self.present = true;
        self.restarts += 1;
    }
}

/// One booking's row in the staff table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBinding {
    pub booking: Booking,
    pub status_cell: String,
    pub selected_status: String,
    pub in_flight: bool,
    pub selector_enabled: bool,
    pub control: UpdateControl,
    pub marker: UpdatedMarker,
}

impl RowBinding {
    pub fn new(booking: Booking) -> Self {
        let status = booking.status.as_deref();
        Self {
            status_cell: status_policy::label_for(status),
            selected_status: status_policy::selector_value_for(status),
            in_flight: false,
            selector_enabled: true,
            control: UpdateControl::default(),
            marker: UpdatedMarker::default(),
            booking,
        }
    }

    pub fn id(&self) -> &BookingId {
        &self.booking.id
    }

    /// Id, description, address and date cells, with placeholders for
    /// anything missing.
    pub fn detail_cells(&self) -> [String; 4] {
        let id = (!self.booking.id.is_empty()).then(|| self.booking.id.as_str());
        [
            or_placeholder(id),
            or_placeholder(self.booking.item_description.as_deref()),
            or_placeholder(self.booking.full_address.as_deref()),
            or_placeholder(self.booking.booking_date.as_deref()),
        ]
    }

    pub(crate) fn begin_update(&mut self) {
        self.in_flight = true;
        self.selector_enabled = false;
        self.control = UpdateControl {
            enabled: false,
            label: UPDATE_PENDING_LABEL,
        };
    }

    pub(crate) fn apply_server_booking(&mut self, booking: Booking) {
        let status = booking.status.as_deref();
        self.status_cell = status_policy::label_for(status);
        self.selected_status = status_policy::selector_value_for(status);
        self.booking = booking;
        self.marker.restart();
    }

    pub(crate) fn end_update(&mut self) {
        self.in_flight = false;
        self.selector_enabled = true;
        self.control = UpdateControl::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Idle,
    Loading { municipality: String },
    Populated { municipality: String, rows: Vec<RowBinding> },
    Empty { municipality: String },
    Failed { municipality: String, error: String },
}

impl TableState {
    pub fn rows(&self) -> &[RowBinding] {
        match self {
            TableState::Populated { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn row(&self, id: &BookingId) -> Option<&RowBinding> {
        self.rows().iter().find(|row| row.id() == id)
    }

    pub(crate) fn row_mut(&mut self, id: &BookingId) -> Option<&mut RowBinding> {
        match self {
            TableState::Populated { rows, .. } => rows.iter_mut().find(|row| row.id() == id),
            _ => None,
        }
    }

    /// The single informational or error row shown instead of bookings.
    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            TableState::Empty { .. } => Some(Placeholder {
                message: EMPTY_MESSAGE.to_string(),
                is_error: false,
            }),
            TableState::Failed { .. } => Some(Placeholder {
                message: LOAD_FAILED_MESSAGE.to_string(),
                is_error: true,
            }),
            _ => None,
        }
    }

    /// Rows rendered in the table body, counting a placeholder as one.
    pub fn rendered_rows(&self) -> usize {
        match self {
            TableState::Populated { rows, .. } => rows.len(),
            TableState::Empty { .. } | TableState::Failed { .. } => 1,
            TableState::Idle | TableState::Loading { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MunicipalityOptions {
    #[default]
    NotLoaded,
    Loaded(Vec<String>),
    Failed,
}

impl MunicipalityOptions {
    pub fn names(&self) -> &[String] {
        match self {
            MunicipalityOptions::Loaded(names) => names,
            _ => &[],
        }
    }

    /// Text shown in the selector when the list could not be loaded.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            MunicipalityOptions::Failed => Some(MUNICIPALITIES_FAILED_MESSAGE),
            _ => None,
        }
    }
}
