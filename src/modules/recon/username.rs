use std::time::Duration;

use reqwest::{Client, Response};

use crate::{
    core::error::CheckError,
    modules::recon::classify::{classify, ClassificationStrategy, Sniffer},
};

/// Most of a profile page the body-sniff strategy will read; the rest is discarded.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Fetch one profile URL and classify the response.
///
/// The whole exchange, body included, runs under `timeout`; on expiry the
/// request future is dropped, which cancels the connection.
pub async fn check_url(
    client: &Client,
    url: &str,
    strategy: ClassificationStrategy,
    sniffer: &Sniffer,
    timeout: Duration,
) -> Result<bool, CheckError> {
    let exchange = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        let body = if strategy.needs_body() {
            Some(read_capped(response, MAX_BODY_BYTES).await?)
        } else {
            None
        };
        Ok::<_, CheckError>(classify(strategy, sniffer, status, body.as_deref()))
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| CheckError::Timeout)?
}

/// Read at most `limit` bytes of the body, lossily decoded.
async fn read_capped(mut response: Response, limit: usize) -> Result<String, CheckError> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - buf.len();
        if chunk.len() >= room {
            buf.extend_from_slice(&chunk[..room]);
            tracing::debug!("body truncated at {limit} bytes");
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
