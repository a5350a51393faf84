use std::sync::Arc;

use crate::config::Config;
use crate::session::Session;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Session,
}
