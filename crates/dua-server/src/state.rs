use std::sync::Arc;

use dua_store::ContentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
}

impl AppState {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }
}
