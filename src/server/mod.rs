use crate::data::configuration::Configuration;
use crate::data::dbconnector::{DirectoryConnection, SQLConnector};
use crate::entity::helpers::fields::Submission;
use crate::entity::helpers::{mutation, query};
use crate::entity::{artists, venues};
use crate::error::DirectoryError;
pub mod types;
use anyhow::Context;
use axum::extract::Path;
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use log::{debug, info};
use std::sync::Arc;
use types::{
    ArtistDetail, ArtistListItem, CityVenues, Notice, SearchRequest, SearchResults, ShowListing,
    VenueDetail,
};

#[derive(Clone)]
pub struct ServerConfig {
    pub database_connection: Arc<SQLConnector>,
}

pub fn router(database_connection: Arc<SQLConnector>) -> Router {
    Router::new()
        .route("/venues", get(list_venues).post(create_venue))
        .route("/venues/create", post(create_venue))
        .route("/venues/search", get(search_venues).post(search_venues))
        .route("/venues/{id}", get(get_venue).delete(delete_venue))
        .route("/venues/{id}/edit", get(edit_venue).post(update_venue))
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/create", post(create_artist))
        .route("/artists/search", get(search_artists).post(search_artists))
        .route("/artists/{id}", get(get_artist).delete(delete_artist))
        .route("/artists/{id}/edit", get(edit_artist).post(update_artist))
        .route("/shows", get(list_shows).post(create_show))
        .route("/shows/create", post(create_show))
        .with_state(ServerConfig {
            database_connection,
        })
}

pub async fn run(config: Configuration, database_connection: SQLConnector) -> anyhow::Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    debug!("Starting server on {address}");

    let shared_db = Arc::new(database_connection);
    let app = router(shared_db.clone());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Listening on {address}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped, closing the database");
    shared_db.close().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

fn submission(pairs: Vec<(String, String)>) -> Submission {
    Submission::new(pairs)
}

async fn list_venues(
    State(state): State<ServerConfig>,
) -> Result<Json<Vec<CityVenues>>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::venues_by_city(db).await?))
}

async fn search_venues(
    State(state): State<ServerConfig>,
    Form(request): Form<SearchRequest>,
) -> Result<Json<SearchResults>, DirectoryError> {
    let db = state.database_connection.connection()?;
    debug!("venue search for {:?}", request.search_term);
    Ok(Json(query::search_venues(db, &request.search_term).await?))
}

async fn get_venue(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetail>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::venue_detail(db, id).await?))
}

async fn edit_venue(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
) -> Result<Json<venues::Model>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::get_venue(db, id).await?))
}

async fn create_venue(
    State(state): State<ServerConfig>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<Notice>), DirectoryError> {
    let db = state.database_connection.connection()?;
    let venue = mutation::create_venue(db, &submission(pairs)).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            message: format!("Venue {} was successfully listed!", venue.name),
            id: venue.id,
        }),
    ))
}

async fn update_venue(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<Notice>, DirectoryError> {
    let db = state.database_connection.connection()?;
    let venue = mutation::update_venue(db, id, &submission(pairs)).await?;
    Ok(Json(Notice {
        message: format!("Venue {} was successfully updated!", venue.name),
        id: venue.id,
    }))
}

async fn delete_venue(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
) -> Result<Json<Notice>, DirectoryError> {
    let db = state.database_connection.connection()?;
    let venue = mutation::delete_venue(db, id).await?;
    Ok(Json(Notice {
        message: format!("Venue {} was deleted.", venue.name),
        id: venue.id,
    }))
}

async fn list_artists(
    State(state): State<ServerConfig>,
) -> Result<Json<Vec<ArtistListItem>>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::list_artists(db).await?))
}

async fn search_artists(
    State(state): State<ServerConfig>,
    Form(request): Form<SearchRequest>,
) -> Result<Json<SearchResults>, DirectoryError> {
    let db = state.database_connection.connection()?;
    debug!("artist search for {:?}", request.search_term);
    Ok(Json(query::search_artists(db, &request.search_term).await?))
}

async fn get_artist(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetail>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::artist_detail(db, id).await?))
}

async fn edit_artist(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
) -> Result<Json<artists::Model>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::get_artist(db, id).await?))
}

async fn create_artist(
    State(state): State<ServerConfig>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<Notice>), DirectoryError> {
    let db = state.database_connection.connection()?;
    let artist = mutation::create_artist(db, &submission(pairs)).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            message: format!("Artist {} was successfully listed!", artist.name),
            id: artist.id,
        }),
    ))
}

async fn update_artist(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<Notice>, DirectoryError> {
    let db = state.database_connection.connection()?;
    let artist = mutation::update_artist(db, id, &submission(pairs)).await?;
    Ok(Json(Notice {
        message: format!("Artist {} was successfully updated!", artist.name),
        id: artist.id,
    }))
}

async fn delete_artist(
    State(state): State<ServerConfig>,
    Path(id): Path<i32>,
) -> Result<Json<Notice>, DirectoryError> {
    let db = state.database_connection.connection()?;
    let artist = mutation::delete_artist(db, id).await?;
    Ok(Json(Notice {
        message: format!("Artist {} was deleted.", artist.name),
        id: artist.id,
    }))
}

async fn list_shows(
    State(state): State<ServerConfig>,
) -> Result<Json<Vec<ShowListing>>, DirectoryError> {
    let db = state.database_connection.connection()?;
    Ok(Json(query::list_shows(db).await?))
}

async fn create_show(
    State(state): State<ServerConfig>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<Notice>), DirectoryError> {
    let db = state.database_connection.connection()?;
    let show = mutation::create_show_from(db, &submission(pairs)).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            message: String::from("Show was successfully listed!"),
            id: show.id,
        }),
    ))
}
