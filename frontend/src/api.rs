use crate::controller::{HttpReply, PredictionClient};
use gloo_net::http::Request;
use shared::PredictionRequest;

pub const PREDICT_ENDPOINT: &str = "/predict";

/// `fetch`-backed client for the prediction endpoint.
pub struct GlooClient {
    endpoint: String,
}

impl GlooClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl PredictionClient for GlooClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<HttpReply, String> {
        let response = Request::post(&self.endpoint)
            .json(request)
            .map_err(|e| format!("Failed to build request: {}", e))?
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string());
        reply_from(status, body)
    }
}

// A success body that cannot be read is a transport failure. Error bodies
// are optional, the status alone is enough to report them.
fn reply_from(status: u16, body: Result<String, String>) -> Result<HttpReply, String> {
    let reply = HttpReply {
        status,
        body: String::new(),
    };
    match body {
        Ok(body) => Ok(HttpReply { body, ..reply }),
        Err(e) if reply.ok() => Err(e),
        Err(e) => {
            log::warn!("Could not read error body for status {}: {}", status, e);
            Ok(reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_bodies_are_kept() {
        let reply = reply_from(200, Ok("{}".into())).unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "{}");

        let reply = reply_from(400, Ok(r#"{"error":"bad"}"#.into())).unwrap();
        assert_eq!(reply.body, r#"{"error":"bad"}"#);
    }

    #[test]
    fn unreadable_success_body_is_a_transport_error() {
        let err = reply_from(200, Err("body stream interrupted".into())).unwrap_err();
        assert_eq!(err, "body stream interrupted");
    }

    #[test]
    fn unreadable_error_body_keeps_the_status() {
        let reply = reply_from(503, Err("body stream interrupted".into())).unwrap();
        assert_eq!(reply.status, 503);
        assert!(reply.body.is_empty());
    }
}
