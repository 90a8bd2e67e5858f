use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    LoaderTrait, ModelTrait, QueryFilter, TransactionTrait,
};
use time::PrimitiveDateTime;

use super::templates::{
    self, ArtistPage, ArtistSummary, ArtistTemplate, ArtistsTemplate, Booking, EditArtistTemplate,
    NewArtistTemplate, SearchArtistsTemplate,
};
use super::{
    error::Error,
    extract::Form,
    flash::{self, Flash},
    forms::{self, ArtistForm, SearchForm},
    genres, shows, AppState,
};
use base::util;
use entity::Tense;

/// Case-insensitive substring match on the artist name. Every match gets
/// its own entry, with its upcoming-show count.
pub async fn search_artists<C>(
    db: &C,
    term: &str,
    now: PrimitiveDateTime,
) -> Result<Vec<ArtistSummary>, DbErr>
where
    C: ConnectionTrait,
{
    let pattern = format!("%{}%", term.to_lowercase());
    let artists = entity::ArtistEntity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                entity::ArtistEntity,
                entity::ArtistColumn::Name,
            ))))
            .like(pattern.as_str()),
        )
        .all(db)
        .await?;
    let shows_by_artist = artists.load_many(entity::ShowEntity, db).await?;
    Ok(artists
        .into_iter()
        .zip(shows_by_artist)
        .map(|(artist, artist_shows)| ArtistSummary {
            id: artist.id,
            name: artist.name,
            num_upcoming_shows: artist_shows
                .iter()
                .filter(|show| show.tense(now) == Some(Tense::Upcoming))
                .count(),
        })
        .collect())
}

/// The full artist page: genre names and shows split into past/upcoming,
/// listing the venue side of each show.
pub async fn artist_page<C>(
    db: &C,
    id: i32,
    now: PrimitiveDateTime,
) -> Result<Option<ArtistPage>, DbErr>
where
    C: ConnectionTrait,
{
    let artist = match entity::ArtistEntity::find_by_id(id).one(db).await? {
        Some(artist) => artist,
        None => return Ok(None),
    };
    let genres = artist
        .find_related(entity::GenreEntity)
        .all(db)
        .await?
        .into_iter()
        .map(|genre| genre.name)
        .collect();
    let artist_shows = artist.find_related(entity::ShowEntity).all(db).await?;
    let venues = artist_shows.load_one(entity::VenueEntity, db).await?;

    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for (show, venue) in artist_shows.iter().zip(venues) {
        let venue = match venue {
            Some(venue) => venue,
            None => continue,
        };
        let entry = Booking {
            venue_id: venue.id,
            venue_name: venue.name,
            venue_image_link: venue.image_link.unwrap_or_default(),
            start_time: shows::start_time_text(show.start_time),
        };
        match show.tense(now) {
            Some(Tense::Past) => past_shows.push(entry),
            Some(Tense::Upcoming) => upcoming_shows.push(entry),
            None => {}
        }
    }
    Ok(Some(ArtistPage {
        artist,
        genres,
        past_shows,
        upcoming_shows,
    }))
}

pub async fn artists(
    State(AppState(db)): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<Response, Error> {
    let artists = entity::ArtistEntity::find().all(&db).await?;
    if artists.is_empty() {
        return Ok(flash::redirect("/", "There are no artists yet, add one").into_response());
    }
    templates::page(ArtistsTemplate {
        flash: flash.flash,
        artists: artists
            .into_iter()
            .map(|artist| ArtistSummary {
                id: artist.id,
                name: artist.name,
                num_upcoming_shows: 0,
            })
            .collect(),
    })
}

pub async fn search(
    State(AppState(db)): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Response, Error> {
    let term = form.search_term.trim().to_owned();
    let tx = db.begin().await?;
    let matches = search_artists(&tx, &term, util::now()).await?;
    templates::page(SearchArtistsTemplate {
        flash: None,
        count: matches.len(),
        matches,
        search_term: term,
    })
}

pub async fn artist(
    State(AppState(db)): State<AppState>,
    Path(id): Path<i32>,
    Query(flash): Query<Flash>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let page = artist_page(&tx, id, util::now())
        .await?
        .ok_or(Error::NotFound(None))?;
    templates::page(ArtistTemplate {
        flash: flash.flash,
        page,
    })
}

pub async fn create_form(Query(flash): Query<Flash>) -> Result<Response, Error> {
    templates::page(NewArtistTemplate { flash: flash.flash })
}

async fn insert_artist<C>(db: &C, form: &ArtistForm) -> Result<entity::Artist, DbErr>
where
    C: ConnectionTrait,
{
    let artist = entity::ArtistActive {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(form.name.trim().to_owned()),
        city: ActiveValue::Set(form.city.trim().to_owned()),
        state: ActiveValue::Set(form.state.trim().to_owned()),
        phone: ActiveValue::Set(forms::optional(&forms::digits(&form.phone))),
        website_link: ActiveValue::Set(forms::optional(&form.website_link)),
        facebook_link: ActiveValue::Set(forms::optional(&form.facebook_link)),
        image_link: ActiveValue::Set(forms::optional(&form.image_link)),
        seeking_venue: ActiveValue::Set(form.seeking_venue.is_some()),
        seeking_description: ActiveValue::Set(forms::optional(&form.seeking_description)),
    }
    .insert(db)
    .await?;
    genres::set_for_artist(db, artist.id, &form.genres).await?;
    Ok(artist)
}

pub async fn create(
    State(AppState(db)): State<AppState>,
    Form(form): Form<ArtistForm>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    match insert_artist(&tx, &form).await {
        Ok(artist) => {
            tx.commit().await?;
            Ok(flash::redirect(
                "/",
                &format!("Artist {} was successfully listed", artist.name),
            )
            .into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, artist = %form.name, "Could not create artist");
            Ok(flash::redirect(
                "/artists/create",
                &format!("An error occurred, artist {} could not be listed", form.name),
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
    let artist = entity::ArtistEntity::find_by_id(id)
        .one(&tx)
        .await?
        .ok_or(Error::NotFound(None))?;
    let genres = artist
        .find_related(entity::GenreEntity)
        .all(&tx)
        .await?
        .into_iter()
        .map(|genre| genre.name)
        .collect();
    templates::page(EditArtistTemplate {
        flash: flash.flash,
        artist,
        genres,
    })
}

async fn update_artist<C>(db: &C, artist: entity::Artist, form: &ArtistForm) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let id = artist.id;
    let mut artist = artist.into_active_model();
    artist.name = ActiveValue::Set(form.name.trim().to_owned());
    artist.city = ActiveValue::Set(form.city.trim().to_owned());
    artist.state = ActiveValue::Set(form.state.trim().to_owned());
    artist.phone = ActiveValue::Set(forms::optional(&forms::digits(&form.phone)));
    artist.website_link = ActiveValue::Set(forms::optional(&form.website_link));
    artist.facebook_link = ActiveValue::Set(forms::optional(&form.facebook_link));
    artist.image_link = ActiveValue::Set(forms::optional(&form.image_link));
    artist.seeking_venue = ActiveValue::Set(form.seeking_venue.is_some());
    artist.seeking_description = ActiveValue::Set(forms::optional(&form.seeking_description));
    artist.update(db).await?;
    genres::set_for_artist(db, id, &form.genres).await?;
    Ok(())
}

pub async fn edit(
    State(AppState(db)): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ArtistForm>,
) -> Result<Response, Error> {
    let tx = db.begin().await?;
    let artist = entity::ArtistEntity::find_by_id(id)
        .one(&tx)
        .await?
        .ok_or(Error::NotFound(None))?;
    match update_artist(&tx, artist, &form).await {
        Ok(()) => {
            tx.commit().await?;
            Ok(flash::redirect(
                &format!("/artists/{id}"),
                "Artist details have been updated",
            )
            .into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, id, "Could not update artist");
            Ok(flash::redirect(
                &format!("/artists/{id}/edit"),
                "Update failed, please try again",
            )
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

    async fn seed_artist(db: &DatabaseConnection, name: &str) -> i32 {
        entity::ArtistActive {
            name: Set(name.to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            seeking_venue: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    async fn seed_venue(db: &DatabaseConnection, name: &str) -> i32 {
        entity::VenueActive {
            name: Set(name.to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            address: Set("1 Main St".to_owned()),
            seeking_talent: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn search_returns_one_entry_per_match() {
        let db = setup().await;
        let now = datetime!(2023-06-10 20:00);
        let petals = seed_artist(&db, "Guns N Petals").await;
        seed_artist(&db, "Matt Quevado").await;
        let sax = seed_artist(&db, "The Wild Sax Band").await;
        let venue = seed_venue(&db, "The Dive").await;

        entity::ShowActive {
            start_time: Set(datetime!(2023-08-01 20:00)),
            artist_id: Set(petals),
            venue_id: Set(venue),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        // "a" matches all three, each with its own row
        let matches = search_artists(&db, "A", now).await.unwrap();
        assert_eq!(matches.len(), 3);
        let petals_row = matches.iter().find(|m| m.id == petals).unwrap();
        assert_eq!(petals_row.num_upcoming_shows, 1);
        let sax_row = matches.iter().find(|m| m.id == sax).unwrap();
        assert_eq!(sax_row.num_upcoming_shows, 0);

        let matches = search_artists(&db, "band", now).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "The Wild Sax Band");
    }

    #[tokio::test]
    async fn artist_page_lists_venue_sides() {
        let db = setup().await;
        let now = datetime!(2023-06-10 20:00);
        let artist = seed_artist(&db, "Guns N Petals").await;
        let venue = seed_venue(&db, "The Dive").await;
        entity::ShowActive {
            start_time: Set(datetime!(2023-08-01 20:00)),
            artist_id: Set(artist),
            venue_id: Set(venue),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let page = artist_page(&db, artist, now).await.unwrap().unwrap();
        assert!(page.past_shows.is_empty());
        assert_eq!(page.upcoming_shows.len(), 1);
        assert_eq!(page.upcoming_shows[0].venue_name, "The Dive");

        assert!(artist_page(&db, artist + 7, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn edit_replaces_fields_and_genre_links() {
        let db = setup().await;
        let artist = seed_artist(&db, "Guns N Petals").await;
        genres::set_for_artist(&db, artist, &["Rock".to_owned()]).await.unwrap();

        let model = entity::ArtistEntity::find_by_id(artist)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let form = ArtistForm {
            name: " Guns N Roses ".to_owned(),
            city: "Los Angeles".to_owned(),
            state: "CA".to_owned(),
            phone: "(213) 555-7777".to_owned(),
            genres: vec!["Hard Rock".to_owned()],
            seeking_venue: Some("on".to_owned()),
            seeking_description: "Looking for stadium gigs".to_owned(),
            image_link: String::new(),
            website_link: String::new(),
            facebook_link: String::new(),
        };
        update_artist(&db, model, &form).await.unwrap();

        let updated = entity::ArtistEntity::find_by_id(artist)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Guns N Roses");
        assert_eq!(updated.phone.as_deref(), Some("2135557777"));
        assert!(updated.seeking_venue);
        assert_eq!(updated.website_link, None);

        let linked = updated
            .find_related(entity::GenreEntity)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(
            linked.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            vec!["Hard Rock"]
        );
    }
}
