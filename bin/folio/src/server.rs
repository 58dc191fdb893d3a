//! Development server with live reload support

use std::{convert::Infallible, path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use folio_generator::html::LIVERELOAD_PATH;
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tower_http::services::{ServeDir, ServeFile};

/// Server state containing the reload broadcaster.
#[derive(Debug, Clone)]
pub struct ServerState {
    reload_tx: broadcast::Sender<()>,
}

impl ServerState {
    /// Create a new server state.
    pub fn new() -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self { reload_tx }
    }

    /// Tell every connected browser to reload.
    pub fn notify_reload(&self) {
        // No subscribers simply means no open pages.
        let _ = self.reload_tx.send(());
    }

    /// Subscribe to reload notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.reload_tx.subscribe()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the development server router.
///
/// Unknown paths get the generated `404.html`.
pub fn create_router(output_dir: &Path, state: Arc<ServerState>) -> Router {
    let files = ServeDir::new(output_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(output_dir.join("404.html")));

    Router::new()
        .route(LIVERELOAD_PATH, get(livereload_handler))
        .fallback_service(files)
        .with_state(state)
}

/// Server-Sent Events handler for live reload.
async fn livereload_handler(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe())
        // Lagged receivers skip missed messages; the next one reloads anyway.
        .filter_map(|msg| msg.ok().map(|()| Ok(Event::default().data("reload"))));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
