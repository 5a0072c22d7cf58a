//! Response handling shared by the sheets backend and the chat client.

use std::time::Duration;

use reqwest::Client;

use crate::error::LunchError;

pub const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024; // 2MB

/// Client with connect and pool timeouts; plain defaults if the builder fails.
pub fn tuned_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("failed to build tuned HTTP client, using defaults: {e}");
            Client::new()
        })
}

/// Map non-success statuses to errors and return the size-capped body.
pub async fn check_response(
    response: reqwest::Response,
    provider: &str,
) -> Result<Vec<u8>, LunchError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(LunchError::RateLimited {
            provider: provider.to_string(),
        });
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(LunchError::AuthFailed {
            provider: provider.to_string(),
            message: format!("{status}"),
        });
    }

    if !status.is_success() {
        let error_bytes = response.bytes().await.unwrap_or_default();
        let truncated = &error_bytes[..error_bytes.len().min(MAX_RESPONSE_BYTES)];
        let text = String::from_utf8_lossy(truncated);
        return Err(LunchError::Upstream {
            provider: provider.to_string(),
            message: format!("{status}: {text}"),
            status: Some(status.as_u16()),
        });
    }

    if let Some(len) = response
        .content_length()
        .map(|n| n as usize)
        .filter(|n| *n > MAX_RESPONSE_BYTES)
    {
        return Err(too_large(provider, len));
    }

    let bytes = response.bytes().await.map_err(|e| LunchError::Upstream {
        provider: provider.to_string(),
        message: format!("failed to read response body: {e}"),
        status: None,
    })?;

    if bytes.len() > MAX_RESPONSE_BYTES {
        return Err(too_large(provider, bytes.len()));
    }

    Ok(bytes.to_vec())
}

fn too_large(provider: &str, len: usize) -> LunchError {
    LunchError::Upstream {
        provider: provider.to_string(),
        message: format!("response too large: {len} bytes (max {MAX_RESPONSE_BYTES})"),
        status: None,
    }
}
