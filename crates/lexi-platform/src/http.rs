//! `HttpPort` over the browser `fetch()` via gloo-net.
//!
//! Status handling stays in the clients: any completed exchange is
//! returned as status + body. Only failures to complete one are errors.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde_json::Value;

use lexi_core::ports::{HttpPort, HttpResponse};
use lexi_types::{LexiError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct FetchHttp;

impl FetchHttp {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl HttpPort for FetchHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = Request::get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LexiError::Network(e.to_string()))?;
        into_http_response(response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        let response = Request::post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| LexiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| LexiError::Network(e.to_string()))?;
        into_http_response(response).await
    }
}

async fn into_http_response(response: Response) -> Result<HttpResponse> {
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|e| {
        log::warn!("Unreadable response body (HTTP {}): {}", status, e);
        String::new()
    });
    Ok(HttpResponse { status, body })
}
