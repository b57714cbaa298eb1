//! Turns a failed response body into a user-facing message.
//!
//! Tiers are tried in order and the first one that yields a message wins:
//! a `message` field of a JSON object, then the raw body as text, then the
//! caller's generic message. No tier can fail the caller.

pub const GENERIC_UPDATE: &str = "Não foi possível atualizar o estado.";
pub const GENERIC_STAFF_LIST: &str = "Não foi possível carregar os agendamentos.";
pub const GENERIC_CREATE: &str =
    "Falha no agendamento. Verifique os dados (e.g., a data é no futuro?).";
pub const GENERIC_LOOKUP: &str = "Ocorreu um erro ao consultar.";
pub const GENERIC_MUNICIPALITIES: &str = "Não foi possível carregar os municípios.";

type Tier = fn(&[u8]) -> Option<String>;

const TIERS: [Tier; 2] = [structured_message, text_body];

pub fn message_from_body(body: Option<&[u8]>, generic: &str) -> String {
    body.and_then(|bytes| TIERS.iter().find_map(|tier| tier(bytes)))
        .unwrap_or_else(|| generic.to_string())
}

/// Reads the body once and runs it through the tiers. A body that cannot be
/// read goes straight to the generic message.
pub async fn error_message(response: reqwest::Response, generic: &str) -> String {
    let body = match response.bytes().await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read error body");
            None
        }
    };
    message_from_body(body.as_deref(), generic)
}

fn structured_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

// A well-formed JSON body without a message is not shown raw.
fn text_body(body: &[u8]) -> Option<String> {
    if serde_json::from_slice::<serde::de::IgnoredAny>(body).is_ok() {
        return None;
    }
    let text = std::str::from_utf8(body).ok()?;
    (!text.is_empty()).then(|| text.to_string())
}
