use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::cache::PageCache;
use crate::cli::Args;
use crate::document::{parse_document, Document};
use crate::html;

/// The current document and its generation, swapped wholesale by `/load`.
/// Generation and document travel together so cached pages can never mix
/// documents.
struct Loaded {
    generation: u64,
    document: Arc<Document>,
}

struct App {
    current: RwLock<Option<Loaded>>,
    cache: Arc<PageCache>,
}

type AppState = Arc<App>;

pub async fn serve(document: Option<Document>, args: Args) -> anyhow::Result<()> {
    let state = Arc::new(App {
        current: RwLock::new(document.map(|document| Loaded {
            generation: 0,
            document: Arc::new(document),
        })),
        cache: PageCache::new(args.enable_cache, args.cache_ttl),
    });

    let router = Router::new()
        .route("/", get(handle_page))
        .route("/load", post(handle_load))
        .fallback(|| async { Redirect::temporary("/") })
        .with_state(state);

    let listener = TcpListener::bind(args.address).await?;
    info!("listening at http://{}", args.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[derive(Deserialize)]
struct PageQuery {
    week: Option<String>,
}

async fn handle_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let (generation, document) = {
        let current = state.current.read().await;
        match current.as_ref() {
            Some(loaded) => (loaded.generation, Arc::clone(&loaded.document)),
            None => return Html(html::notice_page(html::NOTHING_LOADED)).into_response(),
        }
    };

    let selected = match query.week {
        Some(week) if document.week(&week).is_some() => week,
        Some(week) => {
            // an unknown selection is ignored, not an error
            warn!("ignoring unknown week `{week}`");
            return Redirect::temporary("/").into_response();
        }
        None => match document.first_key() {
            Some(key) => key.to_string(),
            None => return Html(html::notice_page(html::NO_WEEKS)).into_response(),
        },
    };

    if let Some(page) = state.cache.get(generation, &selected).await {
        return Html(page.as_ref().clone()).into_response();
    }

    match html::render_page(&document, &selected) {
        Some(page) => {
            let page = Arc::clone(&state.cache)
                .insert(generation, &selected, page)
                .await;
            Html(page.as_ref().clone()).into_response()
        }
        None => Redirect::temporary("/").into_response(),
    }
}

async fn handle_load(State(state): State<AppState>, body: String) -> Response {
    match parse_document(&body) {
        Ok(document) => {
            let weeks = document.len();
            let mut current = state.current.write().await;
            let generation = current.as_ref().map_or(0, |loaded| loaded.generation + 1);
            *current = Some(Loaded {
                generation,
                document: Arc::new(document),
            });

            info!("document replaced ({weeks} weeks)");
            (StatusCode::OK, format!("loaded {weeks} weeks\n")).into_response()
        }
        Err(err) => {
            // rejected candidates leave the current document untouched
            warn!("rejected uploaded document: {err:#}");
            (StatusCode::BAD_REQUEST, format!("{err:#}\n")).into_response()
        }
    }
}
