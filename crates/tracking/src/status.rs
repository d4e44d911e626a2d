//! Lookup outcomes and carrier response parsing.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

pub const EMPTY_CODE: &str = "Código vazio";
pub const NOT_FOUND: &str = "Status não encontrado";
pub const QUERY_ERROR: &str = "Erro na consulta";

const NO_DESCRIPTION: &str = "Sem descrição";

/// Exactly one of these per input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Latest carrier event.
    Found { description: String, timestamp: String },
    /// The row had no tracking code; nothing was requested.
    EmptyCode,
    /// The carrier knows no events for the code.
    NotFound,
    /// Transport failure, timeout, or a body that is not the expected JSON.
    QueryError,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { description, timestamp } => write!(f, "{description} em {timestamp}"),
            Self::EmptyCode => f.write_str(EMPTY_CODE),
            Self::NotFound => f.write_str(NOT_FOUND),
            Self::QueryError => f.write_str(QUERY_ERROR),
        }
    }
}

impl Serialize for TrackingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Interpret a carrier response body.
///
/// `{ "objetos": [ { "eventos": [ { "descricao", "dtHrCriado" }, ... ] } ] }`,
/// newest event first. A missing `objetos` or `eventos` means no events; any
/// other deviation is a query error.
pub fn parse_response(body: &str) -> TrackingStatus {
    match latest_event(body) {
        Ok(Some((description, timestamp))) => TrackingStatus::Found { description, timestamp },
        Ok(None) => TrackingStatus::NotFound,
        Err(cause) => {
            log::warn!("unexpected tracking response: {cause}");
            TrackingStatus::QueryError
        }
    }
}

fn latest_event(body: &str) -> Result<Option<(String, String)>, String> {
    let data: Value = serde_json::from_str(body.trim_start_matches('\u{feff}'))
        .map_err(|e| format!("invalid JSON: {e}"))?;
    let data = data.as_object().ok_or("response is not an object")?;

    let object = match data.get("objetos") {
        None => return Ok(None),
        Some(objetos) => objetos
            .as_array()
            .ok_or("'objetos' is not an array")?
            .first()
            .ok_or("'objetos' is empty")?
            .as_object()
            .ok_or("'objetos[0]' is not an object")?,
    };

    let event = match object.get("eventos") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(events)) => match events.first() {
            None => return Ok(None),
            Some(event) => event.as_object().ok_or("'eventos[0]' is not an object")?,
        },
        Some(_) => return Err("'eventos' is not an array".into()),
    };

    let description = text_field(event.get("descricao"), NO_DESCRIPTION);
    let timestamp = text_field(event.get("dtHrCriado"), "");
    Ok(Some((description, timestamp)))
}

fn text_field(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
