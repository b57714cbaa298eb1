use crate::models::BookingStatus;

pub const UNKNOWN_LABEL: &str = "Desconhecido";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
}

const STATUS_OPTIONS: [StatusOption; 5] = [
    StatusOption { value: "RECEIVED", label: "Recebido" },
    StatusOption { value: "SCHEDULED", label: "Agendado" },
    StatusOption { value: "IN_PROGRESS", label: "Em execução" },
    StatusOption { value: "COMPLETED", label: "Concluído" },
    StatusOption { value: "CANCELLED", label: "Cancelado" },
];

/// Every selectable status in lifecycle order.
pub fn known_statuses() -> &'static [StatusOption] {
    &STATUS_OPTIONS
}

pub fn label(status: BookingStatus) -> &'static str {
    STATUS_OPTIONS
        .iter()
        .find(|option| option.value == status.as_str())
        .map(|option| option.label)
        .unwrap_or(UNKNOWN_LABEL)
}

/// Total over arbitrary input: unrecognised values are echoed back, empty or
/// absent ones become [`UNKNOWN_LABEL`].
pub fn label_for(status: Option<&str>) -> String {
    match status {
        None | Some("") => UNKNOWN_LABEL.to_string(),
        Some(raw) => match BookingStatus::parse(raw) {
            Some(known) => label(known).to_string(),
            None => raw.to_string(),
        },
    }
}

pub fn is_known(value: &str) -> bool {
    STATUS_OPTIONS.iter().any(|option| option.value == value)
}

/// Value a status selector shows for `status`. A value outside the
/// enumeration has no matching option, so the first one is shown.
pub fn selector_value_for(status: Option<&str>) -> String {
    status
        .filter(|s| is_known(s))
        .unwrap_or(STATUS_OPTIONS[0].value)
        .to_string()
}
