//! Shared application state handed to every request handler.

use comanda_db::Database;

use crate::config::ApiConfig;
use crate::notify::Notifier;

/// Cloned into each handler; everything inside is cheap to clone
/// (pool handle, Arc'd sender, small config).
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub notifier: Notifier,
    pub config: ApiConfig,
}
