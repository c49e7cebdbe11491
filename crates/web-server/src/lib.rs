use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use configuration::Settings;
use core_types::{Album, Artist, Track};
use database::{Repositories, Repository};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db: Repositories,
}

impl FromRef<AppState> for Repository<Track> {
    fn from_ref(state: &AppState) -> Self {
        state.db.tracks.clone()
    }
}

impl FromRef<AppState> for Repository<Artist> {
    fn from_ref(state: &AppState) -> Self {
        state.db.artists.clone()
    }
}

impl FromRef<AppState> for Repository<Album> {
    fn from_ref(state: &AppState) -> Self {
        state.db.albums.clone()
    }
}

/// Builds the full route table on top of `state`.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(|| async { "OK" }))
        // --- Plain entities ---
        .route(
            "/tracks",
            get(handlers::get_all::<Track>).post(handlers::add_one::<Track>),
        )
        .route(
            "/tracks/:id",
            get(handlers::get_one::<Track>).patch(handlers::update_track_album),
        )
        .route(
            "/artists",
            get(handlers::get_all::<Artist>).post(handlers::add_one::<Artist>),
        )
        .route("/artists/:id", get(handlers::get_one::<Artist>))
        .route(
            "/albums",
            get(handlers::get_all::<Album>).post(handlers::add_one::<Album>),
        )
        .route("/albums/:id", get(handlers::get_one::<Album>))
        // --- Track / artist relation ---
        .route(
            "/tracks/:track_id/artists/:artist_id",
            post(handlers::add_artist_to_track).delete(handlers::remove_artist_from_track),
        )
        .route("/tracks/:track_id/artists", get(handlers::get_track_artists))
        .route("/artists/:artist_id/tracks", get(handlers::get_artist_tracks))
        .route(
            "/tracks/:track_id/with-artists",
            get(handlers::get_track_with_artists),
        )
        .route(
            "/artists/:artist_id/with-tracks",
            get(handlers::get_artist_with_tracks),
        )
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves `state` on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received.");
        })
        .await?;
    Ok(())
}

/// The main function to configure and run the web server.
pub async fn run_server(config: &Settings) -> anyhow::Result<()> {
    // Tracing is initialized by the calling binary.
    let db_pool = database::connect(&config.database).await?;
    database::run_migrations(&db_pool).await?;
    let state = AppState {
        db: Repositories::new(db_pool),
    };

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    serve(listener, state).await
}
