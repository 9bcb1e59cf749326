use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::backend::TOKEN_HEADER;
use crate::error::ProxyError;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Sends composed requests to the backend with the privileged credential attached.
pub struct Forwarder {
    client: reqwest::Client,
    api_token: String,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, api_token: impl Into<String>) -> Self {
        Self {
            client,
            api_token: api_token.into(),
        }
    }

    pub async fn forward(
        &self,
        method: Method,
        url: Url,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, ProxyError> {
        let upstream = self
            .client
            .request(method, url)
            .headers(outbound_headers(headers))
            .header(TOKEN_HEADER, &self.api_token)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let headers = inbound_headers(upstream.headers());
        let body = upstream.bytes().await?;

        let mut response = (status, body).into_response();
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Caller headers minus anything that identifies the caller to the backend or
/// only makes sense on the client hop.
pub fn outbound_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = strip_hop_by_hop(headers);
    for name in [header::HOST, header::AUTHORIZATION, header::CONTENT_LENGTH, header::ACCEPT_ENCODING] {
        out.remove(name);
    }
    out.remove(TOKEN_HEADER);
    out
}

pub fn inbound_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = strip_hop_by_hop(headers);
    out.remove(header::CONTENT_LENGTH);
    out
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_BY_HOP {
        out.remove(name);
    }
    out
}
