//! Thin HTTP client layer: typed verbs, fluent headers, tagged responses.
//!
//! # Overview
//! `NetClient` resolves endpoints, merges headers, serializes bodies and
//! classifies responses as pure functions over plain request/response data.
//! `NetApi` drives it over a pluggable `Transport`, adds an optional timeout
//! per call, and offers a binary fetch that consults a `CacheStore` first.
//!
//! # Design
//! - Configuration lives in a `NetConfig` owned by each client; there is no
//!   global state.
//! - Non-200 statuses are data, not errors: the envelope carries the real
//!   status and an empty payload.
//! - Response bodies land in exactly one `ResponsePayload` variant: empty,
//!   JSON object/array, raw text, or raw bytes.
//! - The cache is injected and best-effort; when it is unavailable the fetch
//!   simply goes to the network.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod multipart;
pub mod payload;
pub mod response;
#[cfg(feature = "reqwest")]
pub mod transport;
pub mod types;

pub use api::NetApi;
pub use cache::{CacheBucket, CacheStore, MemoryCache, NoCache};
pub use client::{parse_payload, CallOptions, NetClient};
pub use config::NetConfig;
pub use error::{CacheError, NetError, NetResult, TransportError};
pub use headers::{HeaderSet, NetHeaders};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
pub use multipart::{FormPart, MultipartForm};
pub use payload::{BufferPayload, Payload};
pub use response::{NetResponse, ResponsePayload};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use types::{ContentType, HttpStatus, OCTET_STREAM};
