use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use super::{response, Method, RawMesh, TransportError, Triangulator};

/// Client of the triangulation service.
///
/// Calls block; the studio runs them on a worker thread. Cloning shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct ServiceTriangulator {
    client: Client,
    endpoint: String,
}

impl ServiceTriangulator {
    /// Client for `{base_url}/triangulate`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = format!("{}/triangulate", base_url.trim_end_matches('/'));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: endpoint.clone(),
                reason: format!("building client: {e}"),
            })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> TransportError {
        TransportError::Request {
            url: self.endpoint.clone(),
            reason: e.without_url().to_string(),
        }
    }
}

impl Triangulator for ServiceTriangulator {
    fn method(&self) -> Method {
        Method::Service
    }

    fn triangulate(&self, points: &[[f64; 2]]) -> Result<RawMesh, TransportError> {
        let body = serde_json::to_string(points)
            .map_err(|e| TransportError::Malformed(format!("request body: {e}")))?;

        log::debug!("POST {} ({} points)", self.endpoint, points.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        response::decode(&text)
    }
}
