//! Request building and response classification, with no IO.
//!
//! # Design
//! `NetClient` holds only a `NetConfig` and carries no mutable state between
//! calls. `build_request` produces an `HttpRequest` and `parse_response`
//! turns an `HttpResponse` into a `NetResponse`. Whoever executes the
//! round-trip in between (`NetApi` with a `Transport`, or a host of its own)
//! gets the same resolution and classification rules.

use std::time::Duration;

use tracing::debug;

use crate::config::NetConfig;
use crate::headers::HeaderSet;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::multipart::MultipartForm;
use crate::payload::Payload;
use crate::response::{NetResponse, ResponsePayload};
use crate::types::HttpStatus;

/// Backend route that fetches foreign absolute URLs on the caller's behalf.
pub const PROXY_ENDPOINT: &str = "Proxy";

/// Per-call knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub headers: HeaderSet,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Millisecond timeout where any negative value (conventionally `-1`)
    /// means no timeout.
    pub fn with_timeout_millis(mut self, millis: i64) -> Self {
        self.timeout = u64::try_from(millis).ok().map(Duration::from_millis);
        self
    }

    pub fn with_headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }
}

/// Stateless request builder and response classifier.
#[derive(Debug, Clone, Default)]
pub struct NetClient {
    config: NetConfig,
}

impl NetClient {
    pub fn new(config: NetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Absolute endpoints (anything starting with `http`) pass through;
    /// everything else is joined onto the default domain with one `/`.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            let endpoint = endpoint.trim_start_matches('/');
            format!("{}/{endpoint}", self.config.default_domain())
        }
    }

    /// Default headers overlaid by `per_call`.
    pub fn effective_headers(&self, per_call: &HeaderSet) -> HeaderSet {
        self.config.default_headers.merged(per_call)
    }

    pub fn serialize_body(payload: Payload) -> RequestBody {
        match payload {
            Payload::None => RequestBody::Empty,
            Payload::Text(text) => RequestBody::Text(text),
            Payload::Buffers(buffers) => RequestBody::Multipart(MultipartForm::from_buffers(&buffers)),
        }
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: Payload,
        options: &CallOptions,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url: self.resolve_url(endpoint),
            headers: self.effective_headers(&options.headers),
            body: Self::serialize_body(payload),
            timeout: options.timeout,
        }
    }

    /// URL for a buffer fetch.
    ///
    /// Occurrences of the default domain are stripped first. A remaining
    /// absolute URL points at a foreign host and is routed through the
    /// backend's proxy endpoint; anything else resolves normally.
    pub fn buffer_url(&self, endpoint: &str) -> String {
        let domain = self.config.default_domain();
        let stripped = if domain.is_empty() {
            endpoint.to_string()
        } else {
            endpoint.replace(domain, "")
        };
        let stripped = stripped.trim_start_matches('/');

        if stripped.starts_with("http") {
            let proxied = format!("{PROXY_ENDPOINT}?url={}", urlencoding::encode(stripped));
            self.resolve_url(&proxied)
        } else {
            self.resolve_url(stripped)
        }
    }

    pub fn build_buffer_request(&self, endpoint: &str, options: &CallOptions) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.buffer_url(endpoint),
            headers: self.effective_headers(&options.headers),
            body: RequestBody::Empty,
            timeout: options.timeout,
        }
    }

    /// Classify a completed response.
    ///
    /// Only 200 is success. Octet-stream bodies are returned as bytes; every
    /// other body is decoded as text and handed to `parse_payload`.
    pub fn parse_response(&self, response: HttpResponse) -> NetResponse {
        let HttpResponse {
            status,
            status_text,
            body,
            ..
        } = &response;

        if *status != HttpStatus::Ok.as_u16() {
            debug!(status, "non-success status, payload dropped");
            return NetResponse::new(*status, status_text.as_str(), ResponsePayload::Empty);
        }

        if response.is_octet_stream() {
            return NetResponse::new(*status, status_text.as_str(), ResponsePayload::Binary(body.clone()));
        }

        let text = String::from_utf8_lossy(body);
        NetResponse::new(*status, status_text.as_str(), parse_payload(&text))
    }

    /// Classify a buffer fetch response: the body is always taken as bytes.
    pub fn parse_buffer_response(&self, response: HttpResponse) -> NetResponse {
        let payload = if response.status == HttpStatus::Ok.as_u16() {
            ResponsePayload::Binary(response.body)
        } else {
            ResponsePayload::Empty
        };
        NetResponse::new(response.status, response.status_text, payload)
    }
}

/// Decode a text body.
///
/// Empty text and JSON primitives (strings, numbers, booleans, null) collapse
/// to `Empty`; invalid JSON comes back verbatim as `Text`; objects and arrays
/// become `Json`.
pub fn parse_payload(text: &str) -> ResponsePayload {
    if text.is_empty() {
        return ResponsePayload::Empty;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Err(_) => ResponsePayload::Text(text.to_string()),
        Ok(value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => ResponsePayload::Json(value),
        Ok(_) => ResponsePayload::Empty,
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::payload::BufferPayload;
    use crate::types::OCTET_STREAM;

    fn client() -> NetClient {
        NetClient::new(NetConfig::new("https://api.x"))
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, "OK", body.to_string())
    }

    #[test]
    fn relative_endpoint_joins_default_domain() {
        assert_eq!(client().resolve_url("users"), "https://api.x/users");
    }

    #[test]
    fn leading_slash_does_not_double() {
        let client = client();
        assert_eq!(client.resolve_url("/users"), "https://api.x/users");
        assert_eq!(client.resolve_url("/users"), client.buffer_url("/users"));
    }

    #[test]
    fn absolute_endpoint_is_verbatim() {
        assert_eq!(client().resolve_url("https://other.com/y"), "https://other.com/y");
        assert_eq!(client().resolve_url("http://plain.com"), "http://plain.com");
    }

    #[test]
    fn build_request_merges_headers_and_keeps_defaults() {
        let config = NetConfig::new("https://api.x").with_default_headers(HeaderSet::from([("A", "1"), ("B", "2")]));
        let client = NetClient::new(config);
        let options = CallOptions::new().with_headers(HeaderSet::from([("B", "3"), ("C", "4")]));

        let req = client.build_request(HttpMethod::Get, "users", Payload::None, &options);

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.x/users");
        assert_eq!(req.headers, HeaderSet::from([("A", "1"), ("B", "3"), ("C", "4")]));
        assert_eq!(req.body, RequestBody::Empty);
        assert_eq!(req.timeout, None);
        assert_eq!(
            client.config().default_headers,
            HeaderSet::from([("A", "1"), ("B", "2")])
        );
    }

    #[test]
    fn text_payload_is_sent_verbatim() {
        let req = client().build_request(HttpMethod::Post, "users", Payload::from(r#"{"a":1}"#), &CallOptions::new());
        assert_eq!(req.body, RequestBody::Text(r#"{"a":1}"#.to_string()));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn buffer_payload_becomes_multipart_without_content_type() {
        let payload = Payload::from(vec![BufferPayload::new(Bytes::from_static(b"img"), "a.png")]);
        let req = client().build_request(HttpMethod::Put, "upload", payload, &CallOptions::new());
        match req.body {
            RequestBody::Multipart(form) => assert_eq!(form.parts().len(), 1),
            other => panic!("expected multipart body, got {other:?}"),
        }
        assert!(!req.headers.contains("Content-Type"));
    }

    #[test]
    fn timeout_millis_sentinel() {
        assert_eq!(CallOptions::new().with_timeout_millis(-1).timeout, None);
        assert_eq!(
            CallOptions::new().with_timeout_millis(1500).timeout,
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn parse_json_object_and_array() {
        let obj = client().parse_response(ok(r#"{"id":1}"#));
        assert_eq!(obj.payload(), &ResponsePayload::Json(json!({"id": 1})));
        let arr = client().parse_response(ok("[1,2]"));
        assert_eq!(arr.payload(), &ResponsePayload::Json(json!([1, 2])));
    }

    #[test]
    fn parse_primitives_collapse_to_empty() {
        for body in ["42", "true", "null", r#""quoted""#, "-1.5"] {
            assert_eq!(client().parse_response(ok(body)).payload(), &ResponsePayload::Empty, "{body}");
        }
    }

    #[test]
    fn parse_invalid_json_is_raw_text() {
        let resp = client().parse_response(ok("hello world"));
        assert_eq!(resp.payload(), &ResponsePayload::Text("hello world".to_string()));
    }

    #[test]
    fn parse_empty_body() {
        assert!(client().parse_response(ok("")).payload().is_empty());
    }

    #[test]
    fn parse_non_success_drops_body() {
        let resp = client().parse_response(HttpResponse::new(500, "Internal Server Error", r#"{"error":"x"}"#));
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.status_text(), "Internal Server Error");
        assert!(resp.payload().is_empty());
    }

    #[test]
    fn parse_octet_stream_skips_decoding() {
        let raw = Bytes::from_static(b"{\"looks\":\"like json\"}");
        let resp = client().parse_response(HttpResponse::new(200, "OK", raw.clone()).with_header("Content-Type", OCTET_STREAM));
        assert_eq!(resp.payload(), &ResponsePayload::Binary(raw));
    }

    #[test]
    fn buffer_url_relative_and_domain_prefixed() {
        let c = client();
        assert_eq!(c.buffer_url("media/a.png"), "https://api.x/media/a.png");
        assert_eq!(c.buffer_url("https://api.x/media/a.png"), "https://api.x/media/a.png");
    }

    #[test]
    fn buffer_url_foreign_goes_through_proxy() {
        assert_eq!(
            client().buffer_url("https://cdn.other/img 1.png?s=2"),
            "https://api.x/Proxy?url=https%3A%2F%2Fcdn.other%2Fimg%201.png%3Fs%3D2"
        );
    }

    #[test]
    fn buffer_url_without_domain_proxies_absolute() {
        let c = NetClient::default();
        assert_eq!(c.buffer_url("http://a.b/c"), "/Proxy?url=http%3A%2F%2Fa.b%2Fc");
    }

    #[test]
    fn buffer_response_is_bytes_regardless_of_content_type() {
        let resp = client().parse_buffer_response(ok("[1,2,3]").with_header("Content-Type", "application/json"));
        assert_eq!(resp.payload(), &ResponsePayload::Binary(Bytes::from_static(b"[1,2,3]")));

        let missing = client().parse_buffer_response(HttpResponse::new(404, "Not Found", "gone"));
        assert!(missing.payload().is_empty());
    }
}
