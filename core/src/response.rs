//! The response envelope handed back to callers.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NetError, NetResult};
use crate::types::HttpStatus;

/// Tagged response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponsePayload {
    /// Non-success status, empty body, or a JSON primitive.
    #[default]
    Empty,
    /// A JSON object or array.
    Json(Value),
    /// A successful body that is not valid JSON.
    Text(String),
    /// An `application/octet-stream` body, untouched.
    Binary(Bytes),
}

impl ResponsePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ResponsePayload::Empty => "empty",
            ResponsePayload::Json(_) => "json",
            ResponsePayload::Text(_) => "text",
            ResponsePayload::Binary(_) => "binary",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResponsePayload::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponsePayload::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponsePayload::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ResponsePayload::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Deserialize a JSON payload into `U`. `Empty` decodes to `None`; text
    /// and binary payloads are rejected.
    pub fn decode<U: DeserializeOwned>(&self) -> NetResult<Option<U>> {
        match self {
            ResponsePayload::Empty => Ok(None),
            ResponsePayload::Json(v) => U::deserialize(v)
                .map(Some)
                .map_err(|e| NetError::Deserialization(e.to_string())),
            other => Err(NetError::UnexpectedPayload {
                expected: "json",
                found: other.kind(),
            }),
        }
    }
}

/// Status, status text and payload of one completed call.
///
/// Check `status` (or `is_success`) before trusting `payload`: every
/// non-success response carries an empty payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NetResponse<T = ResponsePayload> {
    status: u16,
    status_text: String,
    payload: T,
}

impl<T> NetResponse<T> {
    pub fn new(status: u16, status_text: impl Into<String>, payload: T) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            payload,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn http_status(&self) -> Option<HttpStatus> {
        HttpStatus::from_u16(self.status)
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn is_success(&self) -> bool {
        self.status == HttpStatus::Ok.as_u16()
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn into_parts(self) -> (u16, String, T) {
        (self.status, self.status_text, self.payload)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NetResponse<U> {
        NetResponse {
            status: self.status,
            status_text: self.status_text,
            payload: f(self.payload),
        }
    }
}

impl NetResponse<ResponsePayload> {
    /// Typed view of a JSON payload; see `ResponsePayload::decode`.
    pub fn json<U: DeserializeOwned>(self) -> NetResult<NetResponse<Option<U>>> {
        let decoded = self.payload.decode()?;
        Ok(NetResponse {
            status: self.status,
            status_text: self.status_text,
            payload: decoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    #[test]
    fn decode_json_object() {
        let resp = NetResponse::new(200, "OK", ResponsePayload::Json(json!({"id": 7, "name": "ada"})));
        let typed = resp.json::<User>().unwrap();
        assert_eq!(typed.status(), 200);
        assert_eq!(
            typed.into_payload(),
            Some(User {
                id: 7,
                name: "ada".to_string()
            })
        );
    }

    #[test]
    fn decode_empty_is_none() {
        let resp = NetResponse::new(404, "Not Found", ResponsePayload::Empty);
        assert_eq!(resp.http_status(), Some(HttpStatus::NotFound));
        assert!(!resp.is_success());
        assert_eq!(resp.json::<User>().unwrap().into_payload(), None);
    }

    #[test]
    fn decode_text_is_rejected() {
        let payload = ResponsePayload::Text("hello".to_string());
        let err = payload.decode::<User>().unwrap_err();
        assert!(matches!(err, NetError::UnexpectedPayload { found: "text", .. }));
    }

    #[test]
    fn decode_wrong_shape_is_deserialization_error() {
        let payload = ResponsePayload::Json(json!([1, 2, 3]));
        assert!(matches!(payload.decode::<User>(), Err(NetError::Deserialization(_))));
        assert_eq!(payload.decode::<Vec<u8>>().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn map_keeps_status() {
        let resp = NetResponse::new(200, "OK", ResponsePayload::Binary(Bytes::from_static(b"abc")));
        let len = resp.map(|p| p.as_bytes().map(|b| b.len()));
        assert_eq!(len.into_parts(), (200, "OK".to_string(), Some(3)));
    }
}
