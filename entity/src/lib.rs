mod artist;
mod genre;
mod genre_artist;
mod genre_venue;
mod show;
mod venue;

pub use artist::ActiveModel as ArtistActive;
pub use artist::Column as ArtistColumn;
pub use artist::Entity as ArtistEntity;
pub use artist::Model as Artist;
pub use genre::ActiveModel as GenreActive;
pub use genre::Column as GenreColumn;
pub use genre::Entity as GenreEntity;
pub use genre::Model as Genre;
pub use genre_artist::ActiveModel as GenreArtistActive;
pub use genre_artist::Column as GenreArtistColumn;
pub use genre_artist::Entity as GenreArtistEntity;
pub use genre_artist::Model as GenreArtist;
pub use genre_venue::ActiveModel as GenreVenueActive;
pub use genre_venue::Column as GenreVenueColumn;
pub use genre_venue::Entity as GenreVenueEntity;
pub use genre_venue::Model as GenreVenue;
pub use show::ActiveModel as ShowActive;
pub use show::Column as ShowColumn;
pub use show::Entity as ShowEntity;
pub use show::Model as Show;
pub use show::Tense;
pub use venue::ActiveModel as VenueActive;
pub use venue::Column as VenueColumn;
pub use venue::Entity as VenueEntity;
pub use venue::Model as Venue;
