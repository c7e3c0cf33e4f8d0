use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{templates::welcome_page, AppState};

/// Handler for the route listing (GET /)
pub async fn welcome_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(welcome_page(&state.remote_url).into_string())
}
