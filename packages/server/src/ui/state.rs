//! Server state shared by the handlers.

use std::sync::Arc;

use crate::domain::ConnectionRepository;

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn ConnectionRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }
}
