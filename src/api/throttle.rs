// ============================================================================
// Espacement des requêtes amont
// ============================================================================
// Les APIs gratuites limitent le nombre d'appels par seconde. Au lieu d'un
// sleep fixe après chaque appel, on garantit un écart minimum entre deux
// appels consécutifs : si le précédent est assez ancien, on part tout de suite.
//
// CONCEPT RUST : tokio::sync::Mutex
// - Verrou async : on peut le garder pendant un .await (sleep_until)
// - Les appelants concurrents passent donc un par un, espacés de `spacing`
// ============================================================================

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Garantit un écart minimum entre deux appels amont
#[derive(Debug)]
pub struct RequestSpacing {
    spacing: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RequestSpacing {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_call: Mutex::new(None),
        }
    }

    /// Aucun espacement (tests)
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Attend que l'écart minimum depuis l'appel précédent soit écoulé,
    /// puis réserve le créneau pour l'appel courant
    pub async fn wait_turn(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.spacing;
            if ready_at > Instant::now() {
                trace!(wait_ms = (ready_at - Instant::now()).as_millis() as u64, "Spacing upstream call");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_is_immediate() {
        let spacing = RequestSpacing::new(Duration::from_secs(60));
        let start = Instant::now();
        spacing.wait_turn().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_consecutive_calls_are_spaced() {
        let spacing = RequestSpacing::new(Duration::from_millis(50));
        let start = Instant::now();
        spacing.wait_turn().await;
        spacing.wait_turn().await;
        spacing.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_disabled_never_waits() {
        let spacing = RequestSpacing::disabled();
        let start = Instant::now();
        for _ in 0..10 {
            spacing.wait_turn().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
