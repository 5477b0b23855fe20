//! Marketplace wire types and errors.

use crate::cosign::{CosignError, Instruction, SignatureMatrix};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.catmarket.io";

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{endpoint} rejected the request (code {code}): {msg}")]
    Rejected {
        endpoint: String,
        code: i64,
        msg: String,
    },

    #[error("{endpoint} response is missing {field}")]
    MissingData {
        endpoint: String,
        field: &'static str,
    },

    #[error("{endpoint} response is malformed: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Cosign(#[from] CosignError),
}

/// Response envelope shared by every endpoint. `code == 0` means accepted.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Envelope {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn parse(endpoint: &str, body: Value) -> Result<Self, MarketError> {
        serde_json::from_value(body).map_err(|source| MarketError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Fail with [`MarketError::Rejected`] unless the service accepted the call.
    pub fn accepted(self, endpoint: &str) -> Result<Self, MarketError> {
        if self.code == 0 {
            return Ok(self);
        }
        Err(MarketError::Rejected {
            endpoint: endpoint.to_string(),
            code: self.code,
            msg: self.msg.unwrap_or_default(),
        })
    }
}

/// Templates to co-sign, as carried in `data` of a successful order call.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CosignRequest {
    #[serde(default)]
    pub request_id: Value,
    pub psbts: Vec<String>,
    pub to_sign_inputs: Vec<Vec<Instruction>>,
}

impl CosignRequest {
    pub fn from_data(endpoint: &str, data: Option<Value>) -> Result<Self, MarketError> {
        let data = data.ok_or_else(|| MarketError::MissingData {
            endpoint: endpoint.to_string(),
            field: "data",
        })?;
        let request: Self = serde_json::from_value(data).map_err(|source| MarketError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if request.request_id.is_null() {
            return Err(MarketError::MissingData {
                endpoint: endpoint.to_string(),
                field: "requestId",
            });
        }
        Ok(request)
    }
}

/// Body of the follow-up `<endpoint>Sign` call.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignSubmission<'a> {
    pub request_id: &'a Value,
    pub sigs: &'a SignatureMatrix,
}

/// Endpoint that receives the signatures for `endpoint`.
pub fn sign_endpoint(endpoint: &str) -> String {
    format!("{}Sign", endpoint)
}
