use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::ApiToken;

pub fn default_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .gzip(true)
        .brotli(true)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Attach a bearer token when one is configured; otherwise send the request as is.
pub(crate) fn with_token(request: RequestBuilder, token: Option<&ApiToken>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.get()),
        None => request,
    }
}

/// Strip trailing slashes so that `format!("{base}{path}")` never doubles them.
pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
