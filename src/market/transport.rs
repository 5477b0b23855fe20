use super::api::MarketError;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::RwLock;

/// Transport abstraction for the marketplace API
pub trait Transport {
    /// POST `body` to `endpoint` and return the decoded JSON response.
    fn post(&self, endpoint: &str, body: &Value) -> Result<Value, MarketError>;
}

/// In-memory transport for testing: replays queued responses per endpoint
/// and records every request it receives.
#[cfg(test)]
pub struct MemoryTransport {
    responses: RwLock<HashMap<String, VecDeque<Value>>>,
    requests: RwLock<Vec<(String, Value)>>,
}

#[cfg(test)]
impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
        }
    }

    pub fn respond(&self, endpoint: &str, response: Value) {
        let mut responses = self.responses.write().unwrap();
        responses
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.read().unwrap().clone()
    }
}

#[cfg(test)]
impl Transport for MemoryTransport {
    fn post(&self, endpoint: &str, body: &Value) -> Result<Value, MarketError> {
        self.requests
            .write()
            .unwrap()
            .push((endpoint.to_string(), body.clone()));

        let mut responses = self.responses.write().unwrap();
        responses
            .get_mut(endpoint)
            .and_then(|queue| queue.pop_front())
            .ok_or_else(|| MarketError::Status {
                endpoint: endpoint.to_string(),
                status: 404,
                body: "no canned response".to_string(),
            })
    }
}

/// HTTP transport with bearer authentication
pub struct HttpTransport {
    client: Client,
    base_url: String,
    authorization: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, market_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {}", market_key),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: &str, body: &Value) -> Result<Value, MarketError> {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .json(body)
            .send()
            .map_err(|source| MarketError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(MarketError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        response.json().map_err(|source| MarketError::Http {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}
