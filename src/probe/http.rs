//! Plain HTTP reachability check.

use std::time::Duration;

use super::CheckOutcome;

/// Sends `GET url`. Any HTTP response, whatever its status, means the
/// server is serving HTTP.
pub async fn check(url: &str, timeout: Duration) -> CheckOutcome {
    let client = match reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return CheckOutcome::NotServed {
                reason: e.to_string(),
            };
        }
    };

    match client.get(url).send().await {
        Ok(response) => CheckOutcome::Served {
            status: response.status().as_u16(),
        },
        Err(e) if e.is_timeout() => CheckOutcome::NotServed {
            reason: format!("no answer within {}s", timeout.as_secs()),
        },
        Err(e) => CheckOutcome::NotServed {
            reason: e.to_string(),
        },
    }
}
