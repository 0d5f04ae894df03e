// ============================================================================
// Module : web
// ============================================================================
// Surface HTTP du serveur (actix-web) :
// - handlers : une fonction par route
// - templates : pages HTML Tera embarquées
// - format : nombres → chaînes pour l'affichage
//
// | Route                          | Réponse                               |
// |--------------------------------|---------------------------------------|
// | GET  /                         | dashboard HTML                        |
// | GET  /stock_data               | JSON des cotations                    |
// | GET  /chart-data               | JSON d'une série historique           |
// | GET  /api/calculate_comparison | JSON tableau + séries normalisées     |
// | GET  /compare_stocks           | formulaire du comparateur manuel      |
// | POST /compare_stocks           | formulaire + tableau de résultats     |
// ============================================================================

pub mod format;
pub mod handlers;
pub mod templates;

use std::net::SocketAddr;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::app::AppState;
pub use templates::Templates;

/// Enregistre toutes les routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::index)
        .service(handlers::stock_data)
        .service(handlers::chart_data)
        .service(handlers::calculate_comparison)
        .service(handlers::compare_stocks_form)
        .service(handlers::compare_stocks_submit);
}

/// Lance le serveur HTTP jusqu'à son arrêt (Ctrl+C)
pub async fn serve(state: AppState, templates: Templates, bind_addr: SocketAddr) -> std::io::Result<()> {
    let state = web::Data::new(state);
    let templates = web::Data::new(templates);

    info!(%bind_addr, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(templates.clone())
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}

// ============================================================================
// Tests des routes
// ============================================================================
