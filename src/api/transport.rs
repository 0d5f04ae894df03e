// ============================================================================
// Transport HTTP
// ============================================================================
// Abstraction minimale au-dessus de reqwest : une requête GET avec headers et
// timeout, une réponse (statut + corps texte).
//
// CONCEPTS RUST :
// 1. Trait object : Arc<dyn HttpTransport> permet d'injecter un faux
//    transport dans les tests (aucun test ne touche le réseau)
// 2. Pin<Box<dyn Future>> : une méthode de trait qui retourne une Future
//    tout en restant utilisable via dyn
// ============================================================================

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::error::MarketError;

/// Future renvoyée par un transport
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, MarketError>> + Send + 'a>>;

/// Requête GET sortante
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Réponse brute : statut HTTP + corps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convertit un statut hors 2xx en MarketError::UpstreamStatus
    pub fn error_for_status(self) -> Result<Self, MarketError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(MarketError::UpstreamStatus {
                status: self.status,
            })
        }
    }
}

/// Contrat du transport utilisé par les fetchers
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Transport de production basé sur reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let mut builder = self.client.get(request.url.as_str()).timeout(request.timeout);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    MarketError::Transport(format!("request timeout: {}", e))
                } else if e.is_connect() {
                    MarketError::Transport(format!("connection failed: {}", e))
                } else {
                    MarketError::Transport(format!("request failed: {}", e))
                }
            })?;

            let status = response.status().as_u16();
            debug!(status, url = %request.url, "Received HTTP response");

            let body = response
                .text()
                .await
                .map_err(|e| MarketError::Transport(format!("failed to read body: {}", e)))?;

            Ok(HttpResponse { status, body })
        })
    }
}

// ============================================================================
// Transport factice pour les tests
// ============================================================================

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Renvoie des réponses préenregistrées selon un fragment d'URL
    ///
    /// La première route dont le fragment apparaît dans l'URL gagne ;
    /// une URL inconnue reçoit un 404.
    #[derive(Default)]
    pub struct CannedTransport {
        routes: Vec<(String, Result<HttpResponse, MarketError>)>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, url_fragment: &str, status: u16, body: &str) -> Self {
            self.routes.push((
                url_fragment.to_string(),
                Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
            ));
            self
        }

        pub fn fail(mut self, url_fragment: &str, error: MarketError) -> Self {
            self.routes.push((url_fragment.to_string(), Err(error)));
            self
        }

        /// Requêtes reçues, dans l'ordre
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for CannedTransport {
        fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
            let outcome = self
                .routes
                .iter()
                .find(|(fragment, _)| request.url.contains(fragment.as_str()))
                .map(|(_, outcome)| outcome.clone())
                .unwrap_or_else(|| {
                    Ok(HttpResponse {
                        status: 404,
                        body: "{}".to_string(),
                    })
                });
            self.requests.lock().unwrap().push(request);
            Box::pin(async move { outcome })
        }
    }

    /// JSON Yahoo minimal pour une série de (timestamp, close)
    pub fn yahoo_chart_json(timestamps: &[i64], closes: &[serde_json::Value]) -> String {
        serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "TEST" },
                    "timestamp": timestamps,
                    "indicators": { "quote": [{ "close": closes }] }
                }],
                "error": null
            }
        })
        .to_string()
    }
}
