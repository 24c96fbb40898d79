use std::sync::Arc;

use crate::config::Config;
use crate::render::DocumentConverter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Bounded PDF converter. Default: HTTP document service behind a one-permit semaphore.
    pub converter: Arc<dyn DocumentConverter>,
}
