use std::sync::Arc;

use crate::db::CourseStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub environment: String,
}
