use url::Url;

const EVM_ADDRESS_BYTES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid endpoint url {input:?}: {reason}")]
pub struct InvalidUrl {
    pub input: String,
    pub reason: String,
}

impl InvalidUrl {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Syntactic check for a JSON-RPC endpoint: an absolute `http` or `https`
/// URL with a host. Never touches the network.
///
/// Returns the input trimmed of surrounding whitespace.
pub fn validate_endpoint_url(input: &str) -> Result<String, InvalidUrl> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidUrl::new(input, "empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| InvalidUrl::new(input, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(InvalidUrl::new(
            input,
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(InvalidUrl::new(input, "missing host")),
    }

    Ok(trimmed.to_string())
}

/// `0x` followed by 20 hex encoded bytes. Checksum casing is not enforced.
pub fn is_evm_address(input: &str) -> bool {
    let Some(digits) = input.strip_prefix("0x") else {
        return false;
    };
    matches!(hex::decode(digits), Ok(bytes) if bytes.len() == EVM_ADDRESS_BYTES)
}
