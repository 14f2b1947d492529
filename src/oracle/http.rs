use super::{MoveOracle, OracleError, OracleMove, OracleRequest, OracleResponse};
use crate::config::OracleConfig;
use async_trait::async_trait;
use tracing::{debug, warn};

/// `POST /ai-move` client with a per-request timeout and bounded retry.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: reqwest::Client,
    url: String,
    retries: u32,
}

impl HttpOracle {
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Self { client, url: config.url.clone(), retries: config.retries })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn attempt(&self, request: &OracleRequest) -> Result<OracleMove, OracleError> {
        let resp = self.client.post(&self.url).json(request).send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::Transport(e.to_string())
            }
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }
        let body: OracleResponse =
            resp.json().await.map_err(|e| OracleError::Malformed(e.to_string()))?;
        body.parse_move()
    }
}

#[async_trait]
impl MoveOracle for HttpOracle {
    async fn decide(&self, request: &OracleRequest) -> Result<OracleMove, OracleError> {
        let mut attempt = 0;
        loop {
            match self.attempt(request).await {
                Ok(mv) => {
                    debug!(url = %self.url, ?mv, attempt, "oracle answered");
                    return Ok(mv);
                }
                Err(err) if attempt < self.retries => {
                    warn!(url = %self.url, %err, attempt, "oracle request failed, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::game::{Actor, HandSetup, HandState};

    #[tokio::test]
    async fn unreachable_oracle_reports_transport_error() {
        // port 9 (discard) is closed on loopback in test environments
        let cfg = OracleConfig { url: "http://127.0.0.1:9/ai-move".into(), timeout_ms: 500, retries: 1 };
        let oracle = HttpOracle::new(&cfg).unwrap();
        let state = HandState::start(&HandSetup::heads_up(100), Deck::shuffled_seeded(1)).unwrap();
        let req = OracleRequest::from_state(&state, Actor::Ai);
        let err = oracle.decide(&req).await.unwrap_err();
        assert!(matches!(err, OracleError::Transport(_) | OracleError::Timeout));
    }
}
