// ============================================================================
// DripCompare - Serveur web de cotations et de comparaison d'investissements
// ============================================================================
// Démarrage :
// 1. Configuration (variables d'environnement + .env optionnel)
// 2. Logging (console + fichier quotidien)
// 3. Assemblage de l'état partagé (clients API, cache, espacement)
// 4. Serveur HTTP actix-web
//
// CONCEPTS RUST CLÉS :
// 1. anyhow::Result + .context() : erreurs de démarrage lisibles
// 2. #[actix_web::main] : runtime async pour tout le programme
// 3. Injection de dépendances : transport et cache passés en Arc<dyn Trait>
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use dripcompare::api::ReqwestTransport;
use dripcompare::app::AppState;
use dripcompare::cache::FileQuoteCache;
use dripcompare::config::Config;
use dripcompare::web::{self, Templates};

// ============================================================================
// Initialisation du logging
// ============================================================================

/// Initialise tracing : console + fichier avec rotation quotidienne
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : une sortie par layer (stdout, fichier)
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
///
/// Les logs `log` d'actix-web (middleware Logger) sont redirigés vers
/// tracing par `.init()`.
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/dripcompare.log.*
/// RUST_LOG=dripcompare=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    // Nouveau fichier chaque jour : dripcompare.log.2024-01-15
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "dripcompare.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dripcompare=debug,actix_web=info,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du logging")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Configuration invalide")?;

    // Si le logging échoue, le serveur tourne quand même
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("Warning: failed to initialize logging: {:#}", e);
    });

    info!(
        bind_addr = %config.bind_addr,
        symbols = config.dashboard_symbols.len(),
        cache = %config.cache_path.display(),
        spacing_ms = config.request_spacing.as_millis() as u64,
        "DripCompare starting up"
    );

    let bind_addr = config.bind_addr;
    let cache = Arc::new(FileQuoteCache::new(config.cache_path.clone()));
    let transport = Arc::new(ReqwestTransport::new());
    let state = AppState::new(config, transport, cache);
    let templates = Templates::new().context("Échec du chargement des templates")?;

    web::serve(state, templates, bind_addr)
        .await
        .with_context(|| format!("Le serveur HTTP s'est arrêté sur une erreur ({})", bind_addr))?;

    info!("DripCompare shut down");
    Ok(())
}
