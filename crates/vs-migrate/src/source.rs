use reqwest::Client;

use crate::{
    api_interfaces::{text, wordpress},
    constants::SOURCE_PAGE_SIZE,
    error::ApiError,
    venue::{opening_hours, Coordinates, ImageKind, ImageRef, Venue},
};

/// A venue post from the legacy WordPress site.
#[derive(Debug)]
pub struct SourceVenue(wordpress::Venue);

impl SourceVenue {
    pub fn slug(&self) -> &str {
        &self.0.slug
    }

    /// Rendered title, falling back to the slug.
    pub fn title(&self) -> &str {
        text(&self.0.title.rendered).unwrap_or(&self.0.slug)
    }

    pub fn address(&self) -> Option<&str> {
        text(&self.0.acf.address)
    }

    /// Hero logo, first hero image and map image, in that order, when present.
    pub fn image_refs(&self) -> Vec<ImageRef> {
        let acf = &self.0.acf;
        let first_hero = acf
            .hero_images_venue
            .as_ref()
            .and_then(|images| images.first());
        [
            (ImageKind::HeroLogo, acf.hero_logo_venue.as_ref()),
            (ImageKind::HeroImage, first_hero),
            (ImageKind::Map, acf.find_us_image.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, attachment)| {
            let url = attachment.and_then(|a| text(&a.url))?;
            Some(ImageRef::new(kind, self.slug(), url))
        })
        .collect()
    }

    pub fn opening_hours(&self) -> String {
        let acf = &self.0.acf;
        opening_hours([
            (text(&acf.workday_1), text(&acf.working_hours_1)),
            (text(&acf.workday_2), text(&acf.working_hours_2)),
            (text(&acf.workday_3), text(&acf.working_hours_3)),
        ])
    }

    /// Normalize into a snapshot record.
    pub fn to_venue(&self, coordinates: Option<Coordinates>) -> Venue {
        let acf = &self.0.acf;
        let field = |value: &Option<String>| text(value).unwrap_or_default().to_string();
        Venue {
            id: self.0.id,
            slug: self.0.slug.clone(),
            title: self.title().to_string(),
            hero_title: field(&acf.title_section_game),
            description: field(&acf.description_section_game),
            address: field(&acf.address),
            position: coordinates.into(),
            phone: field(&acf.phone),
            email: field(&acf.email),
            booking_url: field(&acf.book_now_games),
            menu_url: field(&acf.url_menu_button),
            opening_hours: self.opening_hours(),
            images: self.image_refs(),
        }
    }
}

impl From<wordpress::Venue> for SourceVenue {
    fn from(raw: wordpress::Venue) -> Self {
        Self(raw)
    }
}

#[derive(Debug)]
pub struct SourceVenues(Vec<SourceVenue>);

impl SourceVenues {
    /// Retrieve one page of venues from the given listing endpoint.
    pub async fn fetch(client: &Client, endpoint: &str) -> Result<Self, ApiError> {
        let response = client
            .get(endpoint)
            .query(&[("per_page", SOURCE_PAGE_SIZE)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ResponseError(status, body));
        }
        let body = response.text().await.map_err(ApiError::ResponseBodyError)?;
        let raw: Vec<wordpress::Venue> = serde_json::from_str(&body)?;
        Ok(Self(raw.into_iter().map(SourceVenue::from).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceVenue> {
        self.0.iter()
    }
}
