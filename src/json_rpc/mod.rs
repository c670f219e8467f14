#![warn(missing_docs)]

//! JSON-RPC 2.0 envelopes and the quantity encoding used by Ethereum nodes.

use {
    derive_more::{Display, From, Into},
    serde::{Deserialize, Serialize},
    serde_aux::prelude::deserialize_number_from_string,
    std::sync::Arc,
};


/// Protocol version sent with every request.
pub const JSON_RPC_VERSION: &str = "2.0";

/// Represents the message ID type.
#[derive(Copy, Debug, Hash, Clone, PartialEq, Eq, Serialize, Deserialize, From, Into, Display)]
#[serde(transparent)]
pub struct MessageId(#[serde(deserialize_with = "deserialize_number_from_string")] u64);

/// Data structure representing a JSON RPC Request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// ID this message corresponds to.
    pub id: MessageId,
    /// The JSON RPC version.
    pub jsonrpc: Arc<str>,
    /// The RPC method.
    pub method: Arc<str>,
    /// Positional parameters.
    pub params: serde_json::Value,
}

impl JsonRpcRequest {
    /// Create a new instance.
    pub fn new(id: MessageId, method: Arc<str>, params: serde_json::Value) -> Self {
        Self {
            id,
            jsonrpc: JSON_RPC_VERSION.into(),
            method,
            params,
        }
    }
}

/// Enum representing a JSON RPC Response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    /// A response with a result.
    Result(JsonRpcResult),
    /// A response depicting an error.
    Error(JsonRpcError),
}

/// Data structure representing a JSON RPC Result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcResult {
    /// ID this message corresponds to.
    pub id: MessageId,
    /// RPC version.
    pub jsonrpc: Arc<str>,
    /// The result for the message.
    pub result: serde_json::Value,
}

/// Data structure representing a JSON RPC Error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// ID this message corresponds to.
    pub id: MessageId,
    /// RPC version.
    pub jsonrpc: Arc<str>,
    /// The ErrorResponse corresponding to this message.
    pub error: ErrorResponse,
}

/// Data structure representing a ErrorResponse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: Arc<str>,
    /// Error data, if any. Providers put strings as well as objects here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Encode a number as a hex "quantity" (`0x` prefix, no leading zeros).
///
/// <https://ethereum.org/en/developers/docs/apis/json-rpc/#hex-encoding>
pub fn to_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Decode a hex "quantity" that fits in a `u64`, such as a chain id or a
/// block number.
pub fn parse_quantity(value: &serde_json::Value) -> Option<u64> {
    let digits = quantity_digits(value)?;
    u64::from_str_radix(digits, 16).ok()
}

/// Whether the value is a well-formed hex quantity of any size. Balances
/// routinely exceed `u64`, so this only checks the shape.
pub fn is_quantity(value: &serde_json::Value) -> bool {
    quantity_digits(value).is_some()
}

fn quantity_digits(value: &serde_json::Value) -> Option<&str> {
    let digits = value.as_str()?.strip_prefix("0x")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits)
}
