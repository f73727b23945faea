//! Well-known content types and HTTP status codes.
//!
//! Both sets are closed: they cover what callers commonly need when building
//! headers or branching on a response, not every value HTTP allows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker content type for raw binary bodies. Responses carrying it skip text
/// decoding entirely.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Common content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "multipart/form-data")]
    FormData,
    #[serde(rename = "text/plain")]
    Text,
}

impl ContentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::Empty => "",
            ContentType::Json => "application/json",
            ContentType::Png => "image/png",
            ContentType::FormData => "multipart/form-data",
            ContentType::Text => "text/plain",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known `ContentType` values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(ContentType::Empty),
            "application/json" => Ok(ContentType::Json),
            "image/png" => Ok(ContentType::Png),
            "multipart/form-data" => Ok(ContentType::FormData),
            "text/plain" => Ok(ContentType::Text),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}

/// Commonly used HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HttpStatus {
    Ok = 200,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    Conflict = 409,
    ServerError = 500,
}

impl HttpStatus {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(HttpStatus::Ok),
            400 => Some(HttpStatus::BadRequest),
            401 => Some(HttpStatus::Unauthorized),
            403 => Some(HttpStatus::Forbidden),
            404 => Some(HttpStatus::NotFound),
            405 => Some(HttpStatus::MethodNotAllowed),
            409 => Some(HttpStatus::Conflict),
            500 => Some(HttpStatus::ServerError),
            _ => None,
        }
    }

    /// Canonical reason phrase.
    pub const fn reason(self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",
            HttpStatus::BadRequest => "Bad Request",
            HttpStatus::Unauthorized => "Unauthorized",
            HttpStatus::Forbidden => "Forbidden",
            HttpStatus::NotFound => "Not Found",
            HttpStatus::MethodNotAllowed => "Method Not Allowed",
            HttpStatus::Conflict => "Conflict",
            HttpStatus::ServerError => "Internal Server Error",
        }
    }
}

impl From<HttpStatus> for u16 {
    fn from(status: HttpStatus) -> Self {
        status.as_u16()
    }
}

impl PartialEq<u16> for HttpStatus {
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == *other
    }
}

impl PartialEq<HttpStatus> for u16 {
    fn eq(&self, other: &HttpStatus) -> bool {
        *self == other.as_u16()
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}
