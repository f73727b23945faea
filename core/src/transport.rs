//! `Transport` backed by `reqwest`.

use bytes::Bytes;

use crate::error::TransportError;
use crate::headers::{HeaderSet, CONTENT_TYPE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
use crate::multipart::{generate_boundary, MultipartForm};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, pool settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Encode the body. Multipart forms get a fresh boundary and a matching
/// `Content-Type`, replacing any the caller set.
fn encode_body(body: RequestBody, headers: &mut HeaderSet) -> Option<Bytes> {
    match body {
        RequestBody::Empty => None,
        RequestBody::Text(text) => Some(Bytes::from(text)),
        RequestBody::Multipart(form) => {
            let boundary = generate_boundary();
            headers.insert(CONTENT_TYPE, MultipartForm::content_type(&boundary));
            Some(form.encode(&boundary))
        }
    }
}

/// Wrap a reqwest failure, flagging it when the client's own deadline fired.
fn transport_error(message: String, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timed_out(message, error)
    } else {
        TransportError::with_source(message, error)
    }
}

/// Copy response headers. Repeated names (e.g. `Set-Cookie`) are joined with
/// `, ` into one entry; values that are not visible ASCII are skipped.
fn collect_headers(map: &reqwest::header::HeaderMap) -> HeaderSet {
    let mut headers = HeaderSet::new();
    for (name, value) in map {
        if let Ok(value) = value.to_str() {
            headers.append(name.as_str(), value);
        }
    }
    headers
}

impl Transport for ReqwestTransport {
    async fn issue(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            mut headers,
            body,
            timeout,
        } = request;

        let body = encode_body(body, &mut headers);

        let mut builder = self.client.request(to_reqwest_method(method), &url);
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(format!("{method} {url} failed"), e))?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(format!("reading body of {url} failed"), e))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::FormPart;

    #[test]
    fn multipart_body_sets_boundary_header() {
        let mut form = MultipartForm::new();
        form.push(FormPart::text("a", "b"));
        let mut headers = HeaderSet::new();

        let body = encode_body(RequestBody::Multipart(form), &mut headers).unwrap();

        let content_type = headers.get(CONTENT_TYPE).unwrap();
        let boundary = content_type.strip_prefix("multipart/form-data; boundary=").unwrap();
        assert!(body.starts_with(format!("--{boundary}\r\n").as_bytes()));
    }

    #[test]
    fn bare_form_data_content_type_gains_boundary() {
        let mut headers = HeaderSet::from([("content-type", "multipart/form-data")]);
        encode_body(RequestBody::Multipart(MultipartForm::new()), &mut headers);
        assert_eq!(headers.len(), 1);
        assert!(headers.get(CONTENT_TYPE).unwrap().contains("; boundary=netapi-"));
    }

    #[test]
    fn text_body_passes_through() {
        let mut headers = HeaderSet::new();
        let body = encode_body(RequestBody::Text("hi".to_string()), &mut headers);
        assert_eq!(body, Some(Bytes::from_static(b"hi")));
        assert!(headers.is_empty());
        assert_eq!(encode_body(RequestBody::Empty, &mut headers), None);
    }

    #[test]
    fn repeated_response_headers_are_joined() {
        use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE as CT, SET_COOKIE};

        let mut map = HeaderMap::new();
        map.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        map.append(CT, HeaderValue::from_static("text/plain"));
        map.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let headers = collect_headers(&map);

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("set-cookie"), Some("a=1, b=2"));
        assert_eq!(headers.get("content-type"), Some("text/plain"));
    }
}
