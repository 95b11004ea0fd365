//! Shared HTTP response helpers.

use crate::error::FetchError;

/// Pass successful responses through; turn anything else into
/// [`FetchError::Status`] carrying the body text.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
