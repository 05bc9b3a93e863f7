/*!
 * Extra-Info Registry
 * Swappable provider of diagnostic key/value pairs
 *
 * Registration takes the write lock, fetches take the read lock and call the
 * provider while holding it. Providers are expected to be quick.
 */

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Diagnostic key/value pairs reported next to the heap history
pub type ExtraInfo = HashMap<String, serde_json::Value>;

/// Caller-supplied function producing [`ExtraInfo`]
pub type ExtraInfoProvider = Arc<dyn Fn() -> ExtraInfo + Send + Sync>;

#[derive(Default)]
pub struct ExtraInfoRegistry {
    provider: RwLock<Option<ExtraInfoProvider>>,
}

impl ExtraInfoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current provider
    pub fn register<F>(&self, provider: F)
    where
        F: Fn() -> ExtraInfo + Send + Sync + 'static,
    {
        *self.provider.write() = Some(Arc::new(provider));
    }

    /// Remove the current provider
    pub fn clear(&self) {
        *self.provider.write() = None;
    }

    pub fn is_registered(&self) -> bool {
        self.provider.read().is_some()
    }

    /// Provider output, or `None` when nothing is registered
    pub fn fetch_optional(&self) -> Option<ExtraInfo> {
        self.provider.read().as_ref().map(|provider| provider())
    }

    /// Provider output, or an empty map when nothing is registered
    pub fn fetch(&self) -> ExtraInfo {
        self.fetch_optional().unwrap_or_default()
    }
}

impl std::fmt::Debug for ExtraInfoRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtraInfoRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}
