// ============================================================================
// Module : api
// ============================================================================
// Ce module contient tous les clients API pour récupérer les données
// financières : cotations temps réel et historique Yahoo Finance
// ============================================================================

pub mod quote;      // Client API de cotations (Finnhub)
pub mod throttle;   // Espacement minimum entre appels amont
pub mod transport;  // Transport HTTP injectable (reqwest en production)
pub mod yahoo;      // Client API historique Yahoo Finance

// Re-export des types principaux
pub use quote::{display_timestamp, QuoteClient};
pub use throttle::RequestSpacing;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use yahoo::ChartClient;
