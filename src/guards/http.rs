// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use tracing::debug;

use crate::engine_core::errors::ShieldError;
use crate::engine_core::models::{FetchRequest, FetchResponse};
use crate::engine_core::traits::Transport;

/// `reqwest`-backed network primitive. Relative URLs are resolved against
/// the configured base origin, the way a page resolves them against its own.
pub struct ReqwestTransport {
    client: Client,
    base: Option<Url>,
}

impl ReqwestTransport {
    pub fn new(base_origin: Option<&str>, timeout: Duration) -> Result<Self, ShieldError> {
        let base = base_origin
            .map(Url::parse)
            .transpose()
            .map_err(|e| ShieldError::Configuration(format!("Invalid base origin: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| {
                ShieldError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, base })
    }

    pub fn resolve(&self, url: &str) -> Result<Url, ShieldError> {
        let resolved = match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| ShieldError::Transport(format!("Cannot resolve '{}': {}", url, e)))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ShieldError> {
        let url = self.resolve(&request.url)?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| ShieldError::Transport(format!("Invalid method: {}", e)))?;
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ShieldError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ShieldError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_urls_resolve_against_base() {
        let transport =
            ReqwestTransport::new(Some("http://localhost:8080/app/"), Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            transport.resolve("/api/x").unwrap().as_str(),
            "http://localhost:8080/api/x"
        );
        assert_eq!(
            transport.resolve("./data.json").unwrap().as_str(),
            "http://localhost:8080/app/data.json"
        );
    }

    #[test]
    fn test_relative_url_without_base_fails() {
        let transport = ReqwestTransport::new(None, Duration::from_secs(1)).unwrap();
        assert!(matches!(
            transport.resolve("/api/x"),
            Err(ShieldError::Transport(_))
        ));
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(ReqwestTransport::new(Some("not a url"), Duration::from_secs(1)).is_err());
    }
}
