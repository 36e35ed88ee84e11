use serde::Deserialize;

use super::{lenient, lenient_or_default};

/// Raw venue post from the WordPress REST API.
#[derive(Debug, Deserialize)]
pub struct Venue {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub title: Rendered,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub acf: Acf,
}

#[derive(Debug, Default, Deserialize)]
pub struct Rendered {
    #[serde(default, deserialize_with = "lenient")]
    pub rendered: Option<String>,
}

/// Attachment field as exposed by ACF (only the URL is consumed).
#[derive(Debug, Default, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// The ACF custom-field bag. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Acf {
    #[serde(default, deserialize_with = "lenient")]
    pub hero_logo_venue: Option<Attachment>,
    #[serde(default, deserialize_with = "lenient")]
    pub hero_images_venue: Option<Vec<Attachment>>,
    #[serde(default, deserialize_with = "lenient")]
    pub find_us_image: Option<Attachment>,
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title_section_game: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description_section_game: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub book_now_games: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url_menu_button: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub workday_1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub working_hours_1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub workday_2: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub working_hours_2: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub workday_3: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub working_hours_3: Option<String>,
}
