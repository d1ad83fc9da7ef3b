//! Defensive response parsing shared by every downstream adapter (spec
//! §4.1 "Parsing rules"): multiple accepted field-name aliases, numeric
//! fields that may arrive as a JSON number or a string, and unknown fields
//! silently ignored (the default for any `#[derive(Deserialize)]` struct).

use crate::errors::CheckoutError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The uniform response envelope every downstream returns: `{ data, message, ... }`.
#[derive(Debug, serde::Deserialize)]
pub struct UpstreamEnvelope {
    pub data: Value,
    #[serde(default)]
    #[allow(dead_code)]
    pub message: Option<String>,
}

/// Parse a raw downstream JSON body as an [`UpstreamEnvelope`] and decode
/// `data` into `T`.
///
/// # Errors
///
/// Returns [`CheckoutError::UpstreamContractError`] if the envelope or the
/// inner `data` payload don't match the expected shape.
pub fn decode_envelope<T: DeserializeOwned>(body: &Value) -> Result<T, CheckoutError> {
    let envelope: UpstreamEnvelope = serde_json::from_value(body.clone())
        .map_err(|e| CheckoutError::UpstreamContractError(format!("malformed envelope: {e}")))?;
    serde_json::from_value(envelope.data)
        .map_err(|e| CheckoutError::UpstreamContractError(format!("malformed payload: {e}")))
}

/// Read the first of several aliased keys from a JSON object as a string,
/// accepting either a JSON string or a JSON number for the value.
///
/// # Errors
///
/// Returns [`CheckoutError::UpstreamContractError`] naming `field_label` if
/// none of `keys` is present, or the value is neither a string nor a number.
pub fn read_aliased_id(
    value: &Value,
    keys: &[&str],
    field_label: &str,
) -> Result<String, CheckoutError> {
    let object = value.as_object().ok_or_else(|| {
        CheckoutError::UpstreamContractError(format!("expected an object for {field_label}"))
    })?;

    for key in keys {
        if let Some(found) = object.get(*key) {
            return match found {
                Value::String(s) if !s.is_empty() => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => continue,
            };
        }
    }

    Err(CheckoutError::UpstreamContractError(format!(
        "missing required field {field_label} (tried {keys:?})"
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_first_matching_alias() {
        let v = json!({ "order_id": "O1" });
        let id = read_aliased_id(&v, &["id", "order_id", "orderId"], "order id").unwrap();
        assert_eq!(id, "O1");
    }

    #[test]
    fn accepts_numeric_id() {
        let v = json!({ "id": 42 });
        let id = read_aliased_id(&v, &["id", "order_id", "orderId"], "order id").unwrap();
        assert_eq!(id, "42");
    }

    #[test]
    fn missing_all_aliases_errors() {
        let v = json!({ "unrelated": "x" });
        let err = read_aliased_id(&v, &["id", "order_id", "orderId"], "order id");
        assert!(matches!(err, Err(CheckoutError::UpstreamContractError(_))));
    }
}
