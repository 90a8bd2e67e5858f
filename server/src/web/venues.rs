use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use itertools::Itertools;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    LoaderTrait, ModelTrait, QueryFilter, TransactionTrait,
};
use time::PrimitiveDateTime;

use super::templates::{
    self, Area, EditVenueTemplate, NewVenueTemplate, Performance, SearchVenuesTemplate,
    VenuePage, VenueSummary, VenueTemplate, VenuesTemplate,
};
use super::{
    error::Error,
    extract::Form,
    flash::{self, Flash},
    forms::{self, SearchForm, VenueForm},
    genres, shows, AppState,
};
use base::util;
use entity::Tense;

/// All venues grouped by location, sorted by state then city, each venue
/// with its upcoming-show count. Every location group is kept.
pub async fn areas<C>(db: &C, now: PrimitiveDateTime) -> Result<Vec<Area>, DbErr>
where
    C: ConnectionTrait,
{
    let venues = entity::VenueEntity::find().all(db).await?;
    let shows_by_venue = venues.load_many(entity::ShowEntity, db).await?;
    let grouped = venues
        .into_iter()
        .zip(shows_by_venue)
        .map(|(venue, venue_shows)| {
            let num_upcoming_shows = venue_shows
                .iter()
                .filter(|show| show.tense(now) == Some(Tense::Upcoming))
                .count();
            (
                (venue.state, venue.city),
                VenueSummary {
                    id: venue.id,
                    name: venue.name,
                    num_upcoming_shows,
                },
            )
        })
        .into_group_map();
    let mut areas: Vec<Area> = grouped
        .into_iter()
        .map(|((state, city), venues)| Area {
            city,
            state,
            venues,
        })
        .collect();
    areas.sort_unstable_by(|a, b| (&a.state, &a.city).cmp(&(&b.state, &b.city)));
    Ok(areas)
}

/// Case-insensitive substring match on the venue name, one entry per match.
pub async fn search_venues<C>(
    db: &C,
    term: &str,
    now: PrimitiveDateTime,
) -> Result<Vec<VenueSummary>, DbErr>
where
    C: ConnectionTrait,
{
    let pattern = format!("%{}%", term.to_lowercase());
    let venues = entity::VenueEntity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                entity::VenueEntity,
                entity::VenueColumn::Name,
            ))))
            .like(pattern.as_str()),
        )
        .all(db)
        .await?;
    let shows_by_venue = venues.load_many(entity::ShowEntity, db).await?;
    Ok(venues
        .into_iter()
        .zip(shows_by_venue)
        .map(|(venue, venue_shows)| VenueSummary {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: venue_shows
                .iter()
                .filter(|show| show.tense(now) == Some(Tense::Upcoming))
                .count(),
        })
        .collect())
}

/// The full venue page: genre names and shows split into past/upcoming.
pub async fn venue_page<C>(
    db: &C,
    id: i32,
    now: PrimitiveDateTime,
) -> Result<Option<VenuePage>, DbErr>
where
    C: ConnectionTrait,
{
    let venue = match entity::VenueEntity::find_by_id(id).one(db).await? {
        Some(venue) => venue,
        None => return Ok(None),
    };
    let genres = venue
        .find_related(entity::GenreEntity)
        .all(db)
        .await?
        .into_iter()
        .map(|genre| genre.name)
        .collect();
    let venue_shows = venue.find_related(entity::ShowEntity).all(db).await?;
    let artists = venue_shows.load_one(entity::ArtistEntity, db).await?;

    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for (show, artist) in venue_shows.iter().zip(artists) {
        let artist = match artist {
            Some(artist) => artist,
            None => continue,
        };
        let entry = Performance {
            artist_id: artist.id,
            artist_name: artist.name,
            artist_image_link: artist.image_link.unwrap_or_default(),
            start_time: shows::start_time_text(show.start_time),
        };
        match show.tense(now) {
            Some(Tense::Past) => past_shows.push(entry),
            Some(Tense::Upcoming) => upcoming_shows.push(entry),
            None => {}
        }
    }
    Ok(Some(VenuePage {
        venue,
        genres,
        past_shows,
        upcoming_shows,
    }))
}

pub async fn venues(
    State(AppState(db)): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let areas = areas(&tx, util::now()).await?;
    if areas.is_empty() {
        return Ok(flash::redirect("/", "There are no venues yet, add one").into_response());
    }
    templates::page(VenuesTemplate {
        flash: flash.flash,
        areas,
    })
}

pub async fn search(
    State(AppState(db)): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Response, Error> {
    let term = form.search_term.trim().to_owned();
    let tx = db.begin().await?;
    let matches = search_venues(&tx, &term, util::now()).await?;
    templates::page(SearchVenuesTemplate {
        flash: None,
        count: matches.len(),
        matches,
        search_term: term,
    })
}

pub async fn venue(
    State(AppState(db)): State<AppState>,
    Path(id): Path<i32>,
    Query(flash): Query<Flash>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let page = venue_page(&tx, id, util::now())
        .await?
        .ok_or(Error::NotFound(None))?;
    templates::page(VenueTemplate {
        flash: flash.flash,
        page,
    })
}

pub async fn create_form(Query(flash): Query<Flash>) -> Result<Response, Error> {
    templates::page(NewVenueTemplate { flash: flash.flash })
}

async fn insert_venue<C>(db: &C, form: &VenueForm) -> Result<entity::Venue, DbErr>
where
    C: ConnectionTrait,
{
    let venue = entity::VenueActive {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(form.name.trim().to_owned()),
        city: ActiveValue::Set(form.city.trim().to_owned()),
        state: ActiveValue::Set(form.state.trim().to_owned()),
        address: ActiveValue::Set(form.address.trim().to_owned()),
        phone: ActiveValue::Set(forms::optional(&forms::digits(&form.phone))),
        website: ActiveValue::Set(forms::optional(&form.website)),
        facebook_link: ActiveValue::Set(forms::optional(&form.facebook_link)),
        image_link: ActiveValue::Set(forms::optional(&form.image_link)),
        seeking_talent: ActiveValue::Set(form.seeking_talent.is_some()),
        seeking_description: ActiveValue::Set(forms::optional(&form.seeking_description)),
    }
    .insert(db)
    .await?;
    genres::set_for_venue(db, venue.id, &form.genres).await?;
    Ok(venue)
}

pub async fn create(
    State(AppState(db)): State<AppState>,
    Form(form): Form<VenueForm>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    match insert_venue(&tx, &form).await {
        Ok(venue) => {
            tx.commit().await?;
            Ok(flash::redirect(
                "/",
                &format!("Venue {} was successfully listed", venue.name),
            )
            .into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, venue = %form.name, "Could not create venue");
            Ok(flash::redirect(
                "/venues/create",
                &format!("An error occurred, venue {} could not be listed", form.name),
            )
            .into_response())
        }
    }
}

pub async fn edit_form(
    State(AppState(db)): State<AppState>,
    Path(id): Path<i32>,
    Query(flash): Query<Flash>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let venue = entity::VenueEntity::find_by_id(id)
        .one(&tx)
        .await?
        .ok_or(Error::NotFound(None))?;
    let genres = venue
        .find_related(entity::GenreEntity)
        .all(&tx)
        .await?
        .into_iter()
        .map(|genre| genre.name)
        .collect();
    templates::page(EditVenueTemplate {
        flash: flash.flash,
        venue,
        genres,
    })
}

async fn update_venue<C>(db: &C, venue: entity::Venue, form: &VenueForm) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let id = venue.id;
    let mut venue = venue.into_active_model();
    venue.name = ActiveValue::Set(form.name.trim().to_owned());
    venue.city = ActiveValue::Set(form.city.trim().to_owned());
    venue.state = ActiveValue::Set(form.state.trim().to_owned());
    venue.address = ActiveValue::Set(form.address.trim().to_owned());
    venue.phone = ActiveValue::Set(forms::optional(&forms::digits(&form.phone)));
    venue.website = ActiveValue::Set(forms::optional(&form.website));
    venue.facebook_link = ActiveValue::Set(forms::optional(&form.facebook_link));
    venue.image_link = ActiveValue::Set(forms::optional(&form.image_link));
    venue.seeking_talent = ActiveValue::Set(form.seeking_talent.is_some());
    venue.seeking_description = ActiveValue::Set(forms::optional(&form.seeking_description));
    venue.update(db).await?;
    genres::set_for_venue(db, id, &form.genres).await?;
    Ok(())
}

pub async fn edit(
    State(AppState(db)): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<VenueForm>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let venue = entity::VenueEntity::find_by_id(id)
        .one(&tx)
        .await?
        .ok_or(Error::NotFound(None))?;
    match update_venue(&tx, venue, &form).await {
        Ok(()) => {
            tx.commit().await?;
            Ok(flash::redirect(
                &format!("/venues/{id}"),
                "Venue details have been updated",
            )
            .into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, id, "Could not update venue");
            Ok(flash::redirect(
                &format!("/venues/{id}/edit"),
                "Update failed, please try again",
            )
            .into_response())
        }
    }
}

pub async fn destroy(
    State(AppState(db)): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    match entity::VenueEntity::delete_by_id(id).exec(&tx).await {
        Ok(deleted) if deleted.rows_affected > 0 => {
            tx.commit().await?;
            Ok(flash::redirect("/", "Successfully deleted the venue").into_response())
        }
        Ok(_) => Ok(flash::redirect("/", "Deletion failed, please try again").into_response()),
        Err(e) => {
            tracing::error!(error = %e, id, "Could not delete venue");
            Ok(flash::redirect("/", "Deletion failed, please try again").into_response())
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

    async fn seed_venue(db: &DatabaseConnection, name: &str, city: &str, state: &str) -> i32 {
        entity::VenueActive {
            name: Set(name.to_owned()),
            city: Set(city.to_owned()),
            state: Set(state.to_owned()),
            address: Set("1 Main St".to_owned()),
            seeking_talent: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    async fn seed_artist(db: &DatabaseConnection, name: &str) -> i32 {
        entity::ArtistActive {
            name: Set(name.to_owned()),
            city: Set("Oakland".to_owned()),
            state: Set("CA".to_owned()),
            seeking_venue: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    async fn seed_show(
        db: &DatabaseConnection,
        artist_id: i32,
        venue_id: i32,
        start_time: PrimitiveDateTime,
    ) {
        entity::ShowActive {
            start_time: Set(start_time),
            artist_id: Set(artist_id),
            venue_id: Set(venue_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn areas_keep_every_location_group() {
        let db = setup().await;
        let now = datetime!(2023-06-10 20:00);
        let artist = seed_artist(&db, "The Wild Sax Band").await;

        let dive = seed_venue(&db, "The Dive", "San Francisco", "CA").await;
        seed_venue(&db, "The Attic", "San Francisco", "CA").await;
        seed_venue(&db, "Red Room", "New York", "NY").await;
        seed_venue(&db, "Hall A", "Austin", "TX").await;

        seed_show(&db, artist, dive, datetime!(2023-07-01 21:00)).await;
        seed_show(&db, artist, dive, datetime!(2023-01-01 21:00)).await;

        let areas = areas(&db, now).await.unwrap();
        let labels: Vec<(String, String)> = areas
            .iter()
            .map(|area| (area.state.clone(), area.city.clone()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("CA".to_owned(), "San Francisco".to_owned()),
                ("NY".to_owned(), "New York".to_owned()),
                ("TX".to_owned(), "Austin".to_owned()),
            ]
        );
        assert_eq!(areas[0].venues.len(), 2);

        let dive_row = areas[0]
            .venues
            .iter()
            .find(|venue| venue.id == dive)
            .unwrap();
        assert_eq!(dive_row.num_upcoming_shows, 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let db = setup().await;
        let now = datetime!(2023-06-10 20:00);
        seed_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        seed_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        seed_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;

        let matches = search_venues(&db, "MUSIC", now).await.unwrap();
        let mut names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["Park Square Live Music & Coffee", "The Musical Hop"]
        );
    }

    #[tokio::test]
    async fn venue_page_splits_past_and_upcoming() {
        let db = setup().await;
        let now = datetime!(2023-06-10 20:00);
        let venue = seed_venue(&db, "The Dive", "San Francisco", "CA").await;
        let artist = seed_artist(&db, "Guns N Petals").await;
        seed_show(&db, artist, venue, datetime!(2023-01-05 21:00)).await;
        seed_show(&db, artist, venue, datetime!(2023-08-15 21:00)).await;
        // starting exactly now counts as neither
        seed_show(&db, artist, venue, now).await;

        let page = venue_page(&db, venue, now).await.unwrap().unwrap();
        assert_eq!(page.past_shows.len(), 1);
        assert_eq!(page.upcoming_shows.len(), 1);
        assert_eq!(page.past_shows[0].artist_name, "Guns N Petals");
        assert_eq!(page.past_shows[0].start_time, "2023-01-05 21:00");

        assert!(venue_page(&db, venue + 100, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_a_venue_cascades_to_its_shows() {
        let db = setup().await;
        let venue = seed_venue(&db, "The Dive", "San Francisco", "CA").await;
        let artist = seed_artist(&db, "Guns N Petals").await;
        seed_show(&db, artist, venue, datetime!(2023-08-15 21:00)).await;
        genres::set_for_venue(&db, venue, &["Rock".to_owned()]).await.unwrap();

        entity::VenueEntity::delete_by_id(venue)
            .exec(&db)
            .await
            .unwrap();

        assert!(entity::ShowEntity::find().all(&db).await.unwrap().is_empty());
        assert!(entity::GenreVenueEntity::find()
            .all(&db)
            .await
            .unwrap()
            .is_empty());
        // the genre itself survives
        assert_eq!(entity::GenreEntity::find().all(&db).await.unwrap().len(), 1);
    }
}
