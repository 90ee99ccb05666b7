use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// The in-memory session store. Everything dies with the process.
    pub store: Arc<RwLock<Store>>,
    /// Kept on state so handlers gaining config knobs later don't need a
    /// plumbing change; only `main` reads it today.
    #[allow(dead_code)]
    pub config: Config,
}
