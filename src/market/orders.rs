//! Order Flows
//!
//! Every marketplace operation follows the same two-step exchange:
//!
//! 1. POST the order request; the service answers with templates to co-sign
//! 2. co-sign them locally and POST `{ requestId, sigs }` to `<endpoint>Sign`
//!
//! A rejection at step 1 stops the flow before any signing happens.

use super::api::{sign_endpoint, CosignRequest, Envelope, MarketError, SignSubmission};
use super::transport::Transport;
use crate::config::{network_name, Identity};
use crate::cosign::{co_sign_encoded, KeyMaterial, SignatureMatrix};
use crate::CommandResult;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

pub const DEFAULT_TOKEN_AMOUNT: u64 = 5;
pub const DEFAULT_SATOSHIS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Sell,
    Buy,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Sell => "sell",
            OrderSide::Buy => "buy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            OrderSide::Sell => "Make Sell Order",
            OrderSide::Buy => "Make Buy Order",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowOutput {
    endpoint: String,
    request_id: Value,
    templates: usize,
    signatures: usize,
    response: Value,
}

// ============================================================================
// Shared Flow
// ============================================================================

/// Outcome of one request → co-sign → submit exchange
#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub request_id: Value,
    pub sigs: SignatureMatrix,
    pub response: Envelope,
}

/// Run the full exchange for `endpoint`.
pub fn run_flow(
    transport: &dyn Transport,
    keys: &KeyMaterial,
    endpoint: &str,
    body: &Value,
) -> std::result::Result<FlowOutcome, MarketError> {
    info!("Requesting {}", endpoint);
    let envelope = Envelope::parse(endpoint, transport.post(endpoint, body)?)?;
    let envelope = envelope.accepted(endpoint).inspect_err(|e| {
        warn!("{}", e);
    })?;

    let request = CosignRequest::from_data(endpoint, envelope.data)?;
    info!(
        "{}: co-signing {} templates for request {}",
        endpoint,
        request.psbts.len(),
        request.request_id
    );
    let sigs = co_sign_encoded(keys, &request.psbts, &request.to_sign_inputs)?;

    let submit = sign_endpoint(endpoint);
    let submission = SignSubmission {
        request_id: &request.request_id,
        sigs: &sigs,
    };
    let submission = serde_json::to_value(&submission).map_err(|source| MarketError::Decode {
        endpoint: submit.clone(),
        source,
    })?;

    let response = Envelope::parse(&submit, transport.post(&submit, &submission)?)?;
    let response = response.accepted(&submit).inspect_err(|e| {
        warn!("{}", e);
    })?;
    info!("{} accepted request {}", submit, request.request_id);

    Ok(FlowOutcome {
        request_id: request.request_id,
        sigs,
        response,
    })
}

fn flow_core(
    title: &str,
    identity: &Identity,
    transport: &dyn Transport,
    endpoint: &str,
    body: Value,
) -> Result<CommandResult> {
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", title));
    out.push_str(SEPARATOR);
    out.push_str(&format!("Network: {}\n", network_name(identity.network())));
    out.push_str(&format!("Address: {}\n", identity.address()));
    out.push_str(&format!("Request: {}\n\n", serde_json::to_string_pretty(&body)?));

    let outcome = run_flow(transport, identity.keys(), endpoint, &body)
        .with_context(|| format!("{} failed", endpoint))?;

    out.push_str(SEPARATOR);
    out.push_str(&format!("Request ID: {}\n", outcome.request_id));
    out.push_str(&format!("Templates signed: {}\n", outcome.sigs.rows().len()));
    out.push_str(&format!("Signatures: {}\n", outcome.sigs.signed_count()));
    out.push_str(&format!("Submitted to {}\n", sign_endpoint(endpoint)));

    let output = FlowOutput {
        endpoint: endpoint.to_string(),
        request_id: outcome.request_id,
        templates: outcome.sigs.rows().len(),
        signatures: outcome.sigs.signed_count(),
        response: serde_json::to_value(&outcome.response)?,
    };
    let result = serde_json::to_string_pretty(&output)?;

    Ok(CommandResult {
        output: out,
        result,
    })
}

// ============================================================================
// Orders
// ============================================================================

/// Place a sell or buy order for `token_amount` tokens at `satoshis`.
pub fn make_order_core(
    identity: &Identity,
    transport: &dyn Transport,
    token_id: &str,
    token_amount: u64,
    satoshis: u64,
    side: OrderSide,
) -> Result<CommandResult> {
    let body = json!({
        "address": identity.address().to_string(),
        "tokenId": token_id,
        "pubKey": identity.pub_key_hex(),
        "orderType": side.as_str(),
        "tokenAmount": token_amount,
        "satoshis": satoshis,
    });
    flow_core(side.title(), identity, transport, "makeOrder", body)
}

pub fn take_order_core(
    identity: &Identity,
    transport: &dyn Transport,
    order_id: &str,
) -> Result<CommandResult> {
    let body = json!({
        "orderId": order_id,
        "address": identity.address().to_string(),
        "pubKey": identity.pub_key_hex(),
    });
    flow_core("Take Order", identity, transport, "takeOrder", body)
}

/// Take several orders in one request.
pub fn take_orders_core(
    identity: &Identity,
    transport: &dyn Transport,
    order_ids: &[String],
) -> Result<CommandResult> {
    if order_ids.is_empty() {
        anyhow::bail!("At least one order id is required");
    }
    let body = json!({
        "orderIds": order_ids,
        "address": identity.address().to_string(),
        "pubKey": identity.pub_key_hex(),
    });
    flow_core("Take Orders", identity, transport, "takeOrders", body)
}

pub fn cancel_order_core(
    identity: &Identity,
    transport: &dyn Transport,
    order_id: &str,
) -> Result<CommandResult> {
    let body = json!({ "orderId": order_id });
    flow_core("Cancel Order", identity, transport, "cancelOrder", body)
}

/// Limit buy spending `amount` satoshis at `price`.
pub fn buy_limit_core(
    identity: &Identity,
    transport: &dyn Transport,
    token_id: &str,
    price: u64,
    amount: u64,
) -> Result<CommandResult> {
    let body = json!({
        "address": identity.address().to_string(),
        "pubKey": identity.pub_key_hex(),
        "tokenId": token_id,
        "price": price,
        "satoshis": amount,
    });
    flow_core("Buy Limit", identity, transport, "buyLimit", body)
}

/// Limit sell of `amount` tokens at `price`.
pub fn sell_limit_core(
    identity: &Identity,
    transport: &dyn Transport,
    token_id: &str,
    price: u64,
    amount: u64,
) -> Result<CommandResult> {
    let body = json!({
        "address": identity.address().to_string(),
        "pubKey": identity.pub_key_hex(),
        "tokenId": token_id,
        "price": price,
        "tokenAmount": amount,
    });
    flow_core("Sell Limit", identity, transport, "sellLimit", body)
}

// ============================================================================
// Offline
// ============================================================================

/// Show the address and public key the marketplace identifies this client by.
pub fn address_core(identity: &Identity) -> Result<CommandResult> {
    let mut out = String::new();

    out.push_str("Client Identity\n\n");
    out.push_str(SEPARATOR);
    out.push_str(&format!("Network: {}\n", network_name(identity.network())));
    out.push_str(&format!("Address (P2TR): {}\n", identity.address()));
    out.push_str(&format!("Public Key: {}\n", identity.pub_key_hex()));

    let result = serde_json::to_string_pretty(&json!({
        "address": identity.address().to_string(),
        "pubKey": identity.pub_key_hex(),
        "network": network_name(identity.network()),
    }))?;

    Ok(CommandResult {
        output: out,
        result,
    })
}

/// Co-sign a `{ psbts, toSignInputs }` document without contacting the service.
pub fn cosign_core(identity: &Identity, data: &str) -> Result<CommandResult> {
    let mut out = String::new();

    out.push_str("Offline Co-sign\n\n");
    out.push_str(SEPARATOR);

    let request: CosignRequest =
        serde_json::from_str(data).context("Invalid co-sign JSON (expected psbts and toSignInputs)")?;
    out.push_str(&format!("Templates: {}\n", request.psbts.len()));

    let sigs = co_sign_encoded(identity.keys(), &request.psbts, &request.to_sign_inputs)
        .context("Co-signing failed")?;
    out.push_str(&format!("Signatures: {}\n", sigs.signed_count()));

    let result = serde_json::to_string(&json!({ "sigs": sigs }))?;

    Ok(CommandResult {
        output: out,
        result,
    })
}
