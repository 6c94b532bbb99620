use std::future::Future;

/// Runs a best-effort side effect detached from the response path.
///
/// The spawned future's error is logged and dropped; callers must never await
/// or depend on its outcome. Used for the integration-key usage stamp, which
/// is explicitly non-critical.
pub fn spawn_logged<F, E>(label: &'static str, fut: F)
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: std::fmt::Display,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            tracing::warn!("background effect '{}' failed: {}", label, e);
        }
    });
}
