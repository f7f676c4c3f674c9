use crate::config::Config;
use crate::store::ResumeGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Load/save/list/delete on behalf of the signed-in user. Wraps whichever
    /// `ResumeStore` backend was selected at startup.
    pub gateway: ResumeGateway,
    pub config: Config,
}
