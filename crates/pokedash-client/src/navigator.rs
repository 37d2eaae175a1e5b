//! Navigation side effects triggered by the client.

/// Receives the hard redirect issued when a session ends because its token could not be refreshed.
pub trait Navigator: Send + Sync {
    /// Hand control over to `path`, usually the login entry point.
    fn redirect(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn redirect(&self, path: &str) {
        self(path)
    }
}

/// A navigator with nowhere to go. The redirect is only logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        tracing::warn!(path, "session ended, redirect requested");
    }
}
