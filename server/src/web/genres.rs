use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use base::util::dedup;

/// Exact-name lookup, inserting the genre when it does not exist yet.
/// Runs on the caller's transaction so a failed write takes the new
/// genre rows down with it.
pub async fn resolve<C>(db: &C, name: &str) -> Result<entity::Genre, DbErr>
where
    C: ConnectionTrait,
{
    if let Some(genre) = entity::GenreEntity::find()
        .filter(entity::GenreColumn::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(genre);
    }
    entity::GenreActive {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.to_owned()),
    }
    .insert(db)
    .await
}

/// Replaces a venue's genre links with the submitted names.
pub async fn set_for_venue<C>(db: &C, venue_id: i32, names: &[String]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    entity::GenreVenueEntity::delete_many()
        .filter(entity::GenreVenueColumn::VenueId.eq(venue_id))
        .exec(db)
        .await?;
    for name in cleaned(names) {
        let genre = resolve(db, &name).await?;
        entity::GenreVenueEntity::insert(entity::GenreVenueActive {
            genre_id: ActiveValue::Set(genre.id),
            venue_id: ActiveValue::Set(venue_id),
        })
        .exec(db)
        .await?;
    }
    Ok(())
}

/// Replaces an artist's genre links with the submitted names.
pub async fn set_for_artist<C>(db: &C, artist_id: i32, names: &[String]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    entity::GenreArtistEntity::delete_many()
        .filter(entity::GenreArtistColumn::ArtistId.eq(artist_id))
        .exec(db)
        .await?;
    for name in cleaned(names) {
        let genre = resolve(db, &name).await?;
        entity::GenreArtistEntity::insert(entity::GenreArtistActive {
            genre_id: ActiveValue::Set(genre.id),
            artist_id: ActiveValue::Set(artist_id),
        })
        .exec(db)
        .await?;
    }
    Ok(())
}

fn cleaned(names: &[String]) -> Vec<String> {
    dedup(
        names
            .iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect(),
    )
}
