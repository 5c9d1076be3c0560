//! HTTP client construction and the shared webhook POST.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::robot::RobotRuntimeConfig;
use crate::SendResult;

/// Per-request timeout; a webhook slower than this counts as failed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Builds the HTTP client for one robot: HTTP/1.1, standard redirect
/// following, three-minute timeout, and the configured proxy (system
/// default otherwise).
///
/// Certificate verification is disabled only under the robot's `no_ssl`
/// policy. That bypass exists for test targets with self-signed
/// certificates; production configurations must never set it.
pub fn build_client(runtime: &RobotRuntimeConfig) -> Result<Client> {
    let mut builder = Client::builder().timeout(REQUEST_TIMEOUT).http1_only();
    if let Some(proxy) = runtime.proxy.as_deref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }
    if runtime.skip_tls_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }
    Ok(builder.build()?)
}

/// POSTs a JSON body to the webhook and folds every failure mode —
/// connect errors, timeouts, unparseable responses — into a failure
/// [`SendResult`]. The exact request body is attached to the result for
/// debugging.
pub async fn post_json(
    client: &Client,
    url: &str,
    body: String,
    headers: &[(String, String)],
) -> SendResult {
    let mut request = client
        .post(url)
        .header("Content-Type", "application/json")
        .body(body.clone());
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let mut result = match request.send().await {
        Ok(response) => match response.json::<SendResult>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse webhook response");
                SendResult::fail(format!("failed to parse webhook response: {e}"))
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "webhook request failed");
            SendResult::fail(e.to_string())
        }
    };
    result.request_body = Some(body);
    result
}
