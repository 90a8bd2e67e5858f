use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use super::error::Error;

pub fn page<T: Template>(template: T) -> Result<Response, Error> {
    Ok(Html(template.render()?).into_response())
}

/// One venue row in a listing or search result.
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues of one (city, state) location.
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// An artist appearance on a venue page.
pub struct Performance {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

/// A venue appearance on an artist page.
pub struct Booking {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: String,
}

pub struct VenuePage {
    pub venue: entity::Venue,
    pub genres: Vec<String>,
    pub past_shows: Vec<Performance>,
    pub upcoming_shows: Vec<Performance>,
}

pub struct ArtistPage {
    pub artist: entity::Artist,
    pub genres: Vec<String>,
    pub past_shows: Vec<Booking>,
    pub upcoming_shows: Vec<Booking>,
}

pub struct ShowRow {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "venues.html")]
pub struct VenuesTemplate {
    pub flash: Option<String>,
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "search_venues.html")]
pub struct SearchVenuesTemplate {
    pub flash: Option<String>,
    pub search_term: String,
    pub count: usize,
    pub matches: Vec<VenueSummary>,
}

#[derive(Template)]
#[template(path = "venue.html")]
pub struct VenueTemplate {
    pub flash: Option<String>,
    pub page: VenuePage,
}

#[derive(Template)]
#[template(path = "new_venue.html")]
pub struct NewVenueTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "edit_venue.html")]
pub struct EditVenueTemplate {
    pub flash: Option<String>,
    pub venue: entity::Venue,
    pub genres: Vec<String>,
}

#[derive(Template)]
#[template(path = "artists.html")]
pub struct ArtistsTemplate {
    pub flash: Option<String>,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "search_artists.html")]
pub struct SearchArtistsTemplate {
    pub flash: Option<String>,
    pub search_term: String,
    pub count: usize,
    pub matches: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "artist.html")]
pub struct ArtistTemplate {
    pub flash: Option<String>,
    pub page: ArtistPage,
}

#[derive(Template)]
#[template(path = "new_artist.html")]
pub struct NewArtistTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "edit_artist.html")]
pub struct EditArtistTemplate {
    pub flash: Option<String>,
    pub artist: entity::Artist,
    pub genres: Vec<String>,
}

#[derive(Template)]
#[template(path = "shows.html")]
pub struct ShowsTemplate {
    pub flash: Option<String>,
    pub shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "new_show.html")]
pub struct NewShowTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub flash: Option<String>,
    pub code: u16,
    pub title: String,
    pub detail: Option<String>,
}
