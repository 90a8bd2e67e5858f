use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, LoaderTrait,
    TransactionTrait,
};
use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};

use super::templates::{self, NewShowTemplate, ShowRow, ShowsTemplate};
use super::{
    error::Error,
    extract::Form,
    flash::{self, Flash},
    forms::{self, ShowForm},
    AppState,
};

const START_TIME_DISPLAY: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

pub fn start_time_text(start_time: PrimitiveDateTime) -> String {
    start_time.format(START_TIME_DISPLAY).unwrap_or_default()
}

/// Every show joined with its artist and venue.
pub async fn show_rows<C>(db: &C) -> Result<Vec<ShowRow>, DbErr>
where
    C: ConnectionTrait,
{
    let shows = entity::ShowEntity::find().all(db).await?;
    let artists = shows.load_one(entity::ArtistEntity, db).await?;
    let venues = shows.load_one(entity::VenueEntity, db).await?;

    let mut rows = Vec::with_capacity(shows.len());
    for ((show, artist), venue) in shows.iter().zip(artists).zip(venues) {
        let (artist, venue) = match (artist, venue) {
            (Some(artist), Some(venue)) => (artist, venue),
            // foreign keys guarantee both sides exist
            _ => continue,
        };
        rows.push(ShowRow {
            venue_id: venue.id,
            venue_name: venue.name,
            artist_id: artist.id,
            artist_name: artist.name,
            artist_image_link: artist.image_link.unwrap_or_default(),
            start_time: start_time_text(show.start_time),
        });
    }
    Ok(rows)
}

pub async fn shows(
    State(AppState(db)): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let shows = show_rows(&tx).await?;
    templates::page(ShowsTemplate {
        flash: flash.flash,
        shows,
    })
}

pub async fn create_form(Query(flash): Query<Flash>) -> Result<Response, Error> {
    templates::page(NewShowTemplate { flash: flash.flash })
}

pub async fn create(
    State(AppState(db)): State<AppState>,
    Form(form): Form<ShowForm>,
) -> Result<Response, Error> {
    let artist_id: i32 = match form.artist_id.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            return Ok(
                flash::redirect("/shows/create", "The artist id must be a number").into_response(),
            )
        }
    };
    let venue_id: i32 = match form.venue_id.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            return Ok(
                flash::redirect("/shows/create", "The venue id must be a number").into_response(),
            )
        }
    };
    let start_time = match forms::parse_start_time(&form.start_time) {
        Some(start_time) => start_time,
        None => {
            return Ok(flash::redirect(
                "/shows/create",
                "Could not read the start time, use YYYY-MM-DD HH:MM",
            )
            .into_response())
        }
    };

    let tx = db.begin().await?;
    let inserted = entity::ShowActive {
        id: ActiveValue::NotSet,
        start_time: ActiveValue::Set(start_time),
        artist_id: ActiveValue::Set(artist_id),
        venue_id: ActiveValue::Set(venue_id),
    }
    .insert(&tx)
    .await;
    match inserted {
        Ok(_) => {
            tx.commit().await?;
            Ok(flash::redirect("/", "Show was successfully listed").into_response())
        }
        // a missing artist or venue surfaces as a foreign key violation
        Err(e) => {
            tracing::error!(error = %e, artist_id, venue_id, "Could not create show");
            Ok(flash::redirect("/shows/create", "An error occurred, show could not be listed")
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{Database, DatabaseConnection, Set};
    use sea_orm_migration::MigratorTrait;
    use time::macros::datetime;

    async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed(db: &DatabaseConnection) -> (i32, i32) {
        let artist = entity::ArtistActive {
            name: Set("Guns N Petals".to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            seeking_venue: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        let venue = entity::VenueActive {
            name: Set("The Dive".to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            address: Set("1 Main St".to_owned()),
            seeking_talent: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        (artist.id, venue.id)
    }

    #[tokio::test]
    async fn rows_join_artist_and_venue() {
        let db = setup().await;
        let (artist_id, venue_id) = seed(&db).await;
        entity::ShowActive {
            start_time: Set(datetime!(2023-08-01 20:00)),
            artist_id: Set(artist_id),
            venue_id: Set(venue_id),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let rows = show_rows(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].artist_name, "Guns N Petals");
        assert_eq!(rows[0].venue_name, "The Dive");
        assert_eq!(rows[0].start_time, "2023-08-01 20:00");
    }

    #[tokio::test]
    async fn dangling_references_are_rejected() {
        let db = setup().await;
        let (artist_id, _) = seed(&db).await;
        let result = entity::ShowActive {
            start_time: Set(datetime!(2023-08-01 20:00)),
            artist_id: Set(artist_id),
            venue_id: Set(999),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(result.is_err());
    }
}
