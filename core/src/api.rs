//! Async dispatcher: one method per HTTP verb plus the cached buffer fetch.
//!
//! # Design
//! `NetApi` pairs a `NetClient` (request building, response classification)
//! with a `Transport` and an optional `CacheStore`. Every call is
//! independent: the only shared state is the read-only configuration. There
//! are no retries; a transport failure or elapsed timeout ends the call with
//! an `Err`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheBucket, CacheStore, NoCache};
use crate::client::{CallOptions, NetClient};
use crate::config::NetConfig;
use crate::error::{NetError, NetResult};
use crate::headers::CONTENT_TYPE;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::payload::Payload;
use crate::response::NetResponse;
use crate::types::{ContentType, HttpStatus};

pub struct NetApi<T, C = NoCache> {
    client: NetClient,
    transport: T,
    cache: C,
}

impl<T: Transport> NetApi<T, NoCache> {
    pub fn new(config: NetConfig, transport: T) -> Self {
        Self {
            client: NetClient::new(config),
            transport,
            cache: NoCache,
        }
    }
}

impl<T: Transport, C: CacheStore> NetApi<T, C> {
    /// Replace the cache store used by `get_buffer`.
    pub fn with_cache<C2: CacheStore>(self, cache: C2) -> NetApi<T, C2> {
        NetApi {
            client: self.client,
            transport: self.transport,
            cache,
        }
    }

    pub fn config(&self) -> &NetConfig {
        self.client.config()
    }

    pub fn client(&self) -> &NetClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Swap in a new configuration for subsequent calls.
    pub fn reconfigure(&mut self, config: NetConfig) {
        self.client = NetClient::new(config);
    }

    pub async fn get(&self, endpoint: &str, options: CallOptions) -> NetResult<NetResponse> {
        self.call(HttpMethod::Get, endpoint, Payload::None, options).await
    }

    pub async fn post(&self, endpoint: &str, payload: impl Into<Payload>, options: CallOptions) -> NetResult<NetResponse> {
        self.call(HttpMethod::Post, endpoint, payload.into(), options).await
    }

    pub async fn put(&self, endpoint: &str, payload: impl Into<Payload>, options: CallOptions) -> NetResult<NetResponse> {
        self.call(HttpMethod::Put, endpoint, payload.into(), options).await
    }

    pub async fn patch(&self, endpoint: &str, payload: impl Into<Payload>, options: CallOptions) -> NetResult<NetResponse> {
        self.call(HttpMethod::Patch, endpoint, payload.into(), options).await
    }

    pub async fn delete(&self, endpoint: &str, payload: impl Into<Payload>, options: CallOptions) -> NetResult<NetResponse> {
        self.call(HttpMethod::Delete, endpoint, payload.into(), options).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        options: CallOptions,
    ) -> NetResult<NetResponse> {
        self.call_json(HttpMethod::Post, endpoint, body, options).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        options: CallOptions,
    ) -> NetResult<NetResponse> {
        self.call_json(HttpMethod::Put, endpoint, body, options).await
    }

    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        options: CallOptions,
    ) -> NetResult<NetResponse> {
        self.call_json(HttpMethod::Patch, endpoint, body, options).await
    }

    /// Fetch raw bytes, consulting the configured cache first unless
    /// `use_cache` is false.
    ///
    /// A hit returns the stored status, status text and bytes without any
    /// network call. A miss answered with 200 stores the raw response under
    /// the resolved URL; any other status is returned but never stored, so a
    /// transient 404 or 500 is refetched next time. An unavailable or failing
    /// cache degrades to a plain network fetch.
    pub async fn get_buffer(&self, endpoint: &str, options: CallOptions, use_cache: bool) -> NetResult<NetResponse> {
        let request = self.client.build_buffer_request(endpoint, &options);
        let url = request.url.clone();

        let bucket = if use_cache { self.open_bucket().await } else { None };

        if let Some(bucket) = &bucket {
            match bucket.lookup(&url).await {
                Ok(Some(cached)) => {
                    debug!(url = %url, "buffer cache hit");
                    return Ok(self.client.parse_buffer_response(cached));
                }
                Ok(None) => debug!(url = %url, "buffer cache miss"),
                Err(e) => warn!(url = %url, error = %e, "buffer cache lookup failed, fetching"),
            }
        }

        let response = self.send_raw(request).await?;

        if let Some(bucket) = &bucket {
            if response.status == HttpStatus::Ok.as_u16() {
                if let Err(e) = bucket.put(&url, response.clone()).await {
                    warn!(url = %url, error = %e, "buffer cache write failed");
                }
            }
        }

        Ok(self.client.parse_buffer_response(response))
    }

    /// Issue a prebuilt request and classify the response.
    pub async fn send(&self, request: HttpRequest) -> NetResult<NetResponse> {
        let response = self.send_raw(request).await?;
        Ok(self.client.parse_response(response))
    }

    async fn call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: Payload,
        options: CallOptions,
    ) -> NetResult<NetResponse> {
        let request = self.client.build_request(method, endpoint, payload, &options);
        self.send(request).await
    }

    async fn call_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
        mut options: CallOptions,
    ) -> NetResult<NetResponse> {
        let text = serde_json::to_string(body).map_err(|e| NetError::Serialization(e.to_string()))?;
        if !options.headers.contains(CONTENT_TYPE) && !self.config().default_headers.contains(CONTENT_TYPE) {
            options.headers.insert(CONTENT_TYPE, ContentType::Json.as_str());
        }
        self.call(method, endpoint, Payload::Text(text), options).await
    }

    async fn send_raw(&self, request: HttpRequest) -> NetResult<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, url = %url, "dispatching request");

        let response = match request.timeout {
            Some(after) => match tokio::time::timeout(after, self.transport.issue(request)).await {
                Ok(Err(e)) if e.is_timed_out() => {
                    warn!(%method, url = %url, ?after, "transport deadline elapsed");
                    return Err(NetError::Timeout { after });
                }
                Ok(result) => result?,
                Err(_) => {
                    warn!(%method, url = %url, ?after, "request timed out");
                    return Err(NetError::Timeout { after });
                }
            },
            None => self.transport.issue(request).await?,
        };

        debug!(%method, url = %url, status = response.status, "request completed");
        Ok(response)
    }

    async fn open_bucket(&self) -> Option<C::Bucket> {
        let name = &self.config().cache_name;
        match self.cache.open(name).await {
            Ok(bucket) => Some(bucket),
            Err(e) => {
                debug!(cache = %name, error = %e, "cache unavailable, bypassing");
                None
            }
        }
    }
}

impl<T, C> std::fmt::Debug for NetApi<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetApi").field("client", &self.client).finish_non_exhaustive()
    }
}
