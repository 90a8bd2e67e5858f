pub mod artists;
pub mod error;
pub mod extract;
pub mod flash;
pub mod forms;
pub mod genres;
pub mod shows;
pub mod templates;
pub mod venues;

use axum::{
    extract::Query,
    response::Response,
    routing::{get, post},
    Router,
};
use base::database::get_database;
pub use error::Error;
use eyre::Result;
use sea_orm::DbConn;
use tower_http::trace::TraceLayer;

use flash::Flash;
use templates::HomeTemplate;

#[derive(Clone)]
pub struct AppState(pub DbConn);

pub fn router() -> Result<Router> {
    let tracing = TraceLayer::new_for_http();
    let conn = get_database()?.clone();
    Ok(Router::new()
        .route("/", get(home))
        .route("/venues", get(venues::venues))
        .route("/venues/search", post(venues::search))
        .route("/venues/:id", get(venues::venue).delete(venues::destroy))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create),
        )
        .route(
            "/venues/:id/edit",
            get(venues::edit_form).post(venues::edit),
        )
        .route("/artists", get(artists::artists))
        .route("/artists/search", post(artists::search))
        .route("/artists/:id", get(artists::artist))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create),
        )
        .route(
            "/artists/:id/edit",
            get(artists::edit_form).post(artists::edit),
        )
        .route("/shows", get(shows::shows))
        .route(
            "/shows/create",
            get(shows::create_form).post(shows::create),
        )
        .layer(tracing)
        .with_state(AppState(conn)))
}

async fn home(Query(flash): Query<Flash>) -> Result<Response, Error> {
    templates::page(HomeTemplate { flash: flash.flash })
}
