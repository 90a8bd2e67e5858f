use serde_derive::Deserialize;
use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};

// What datetime-local inputs submit, with or without seconds.
const START_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute][optional [:[second]]]");

#[derive(Debug, Deserialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub seeking_talent: Option<String>,
    #[serde(default)]
    pub seeking_description: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub facebook_link: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub seeking_venue: Option<String>,
    #[serde(default)]
    pub seeking_description: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default)]
    pub facebook_link: String,
}

#[derive(Debug, Deserialize)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Empty or whitespace-only inputs become NULL columns.
pub fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Phone numbers keep their digits only.
pub fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn parse_start_time(value: &str) -> Option<PrimitiveDateTime> {
    let value = value.trim().replacen('T', " ", 1);
    PrimitiveDateTime::parse(&value, START_TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn start_time_parses_with_and_without_seconds() {
        assert_eq!(
            parse_start_time("2023-06-10 20:00"),
            Some(datetime!(2023-06-10 20:00))
        );
        assert_eq!(
            parse_start_time("2023-06-10 20:00:30"),
            Some(datetime!(2023-06-10 20:00:30))
        );
    }

    #[test]
    fn start_time_accepts_the_datetime_local_separator() {
        assert_eq!(
            parse_start_time(" 2023-06-10T20:00 "),
            Some(datetime!(2023-06-10 20:00))
        );
    }

    #[test]
    fn start_time_rejects_garbage() {
        assert_eq!(parse_start_time("next friday"), None);
        assert_eq!(parse_start_time(""), None);
    }

    #[test]
    fn optional_drops_blank_inputs() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" https://example.com "), Some("https://example.com".to_owned()));
    }

    #[test]
    fn phone_numbers_keep_digits_only() {
        assert_eq!(digits("(415) 555-1234"), "4155551234");
    }
}
