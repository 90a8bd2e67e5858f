use axum::response::Redirect;
use serde_derive::Deserialize;

/// Flash messages ride a `flash` query parameter on the redirect and are
/// rendered by the page layout. There is no session state to keep them in.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub flash: Option<String>,
}

pub fn redirect(path: &str, message: &str) -> Redirect {
    Redirect::to(&location(path, message))
}

fn location(path: &str, message: &str) -> String {
    format!("{}?flash={}", path, urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_percent_encoded() {
        assert_eq!(
            location("/venues", "Venue A & B was listed"),
            "/venues?flash=Venue%20A%20%26%20B%20was%20listed"
        );
    }
}
