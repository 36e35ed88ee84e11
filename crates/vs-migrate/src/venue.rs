use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    constants::OPENING_HOURS_SEPARATOR,
    error::{LoadError, SaveError},
};

/// A resolved latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Optional coordinates written as a `latitude`/`longitude` pair that is
/// either fully set or fully null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PositionFields", into = "PositionFields")]
pub struct Position(Option<Coordinates>);

#[derive(Clone, Copy, Serialize, Deserialize)]
struct PositionFields {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<PositionFields> for Position {
    fn from(fields: PositionFields) -> Self {
        match (fields.latitude, fields.longitude) {
            (Some(latitude), Some(longitude)) => Self(Some(Coordinates::new(latitude, longitude))),
            _ => Self(None),
        }
    }
}

impl From<Position> for PositionFields {
    fn from(position: Position) -> Self {
        Self {
            latitude: position.0.map(|c| c.latitude),
            longitude: position.0.map(|c| c.longitude),
        }
    }
}

impl From<Option<Coordinates>> for Position {
    fn from(coordinates: Option<Coordinates>) -> Self {
        Self(coordinates)
    }
}

impl Position {
    pub fn get(&self) -> Option<Coordinates> {
        self.0
    }
}

/// Role of an image on the venue page, as named in the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    HeroLogo,
    HeroImage,
    Map,
}

/// Role of an image as named by the CMS venue schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmsImageKind {
    HeroLogo,
    HeroImage,
    FindUs,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeroLogo => "hero_logo",
            Self::HeroImage => "hero_image",
            Self::Map => "map",
        }
    }

    /// File name of this image for a venue in the local store.
    pub fn file_name(&self, slug: &str) -> String {
        let stem = match self {
            Self::HeroLogo => "hero-logo",
            Self::HeroImage => "hero-image",
            Self::Map => "map",
        };
        format!("{slug}-{stem}.jpg")
    }

    pub fn cms_kind(&self) -> CmsImageKind {
        match self {
            Self::HeroLogo => CmsImageKind::HeroLogo,
            Self::HeroImage => CmsImageKind::HeroImage,
            Self::Map => CmsImageKind::FindUs,
        }
    }
}

/// Reference to an image that lives (or will live) in the local store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub filename: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
}

impl ImageRef {
    pub fn new(kind: ImageKind, slug: &str, original_url: &str) -> Self {
        Self {
            kind,
            filename: kind.file_name(slug),
            original_url: original_url.to_string(),
        }
    }
}

/// A venue as stored in the snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub hero_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(flatten)]
    pub position: Position,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub booking_url: String,
    #[serde(default)]
    pub menu_url: String,
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl Venue {
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.position.get()
    }
}

/// Join the populated `workday: hours` pairs, skipping any pair with a blank side.
pub fn opening_hours<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    pairs
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(day), Some(hours)) if !day.is_empty() && !hours.is_empty() => {
                Some(format!("{day}: {hours}"))
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(OPENING_HOURS_SEPARATOR)
}

/// The exporter's output: every venue, in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub Vec<Venue>);

impl Snapshot {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file_contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&file_contents)?)
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveError> {
        let mut serialized = serde_json::to_string_pretty(&self.0)?;
        serialized.push('\n');
        tokio::fs::write(path, serialized).await?;
        Ok(())
    }

    pub fn venues(&self) -> &[Venue] {
        &self.0
    }

    pub fn image_count(&self) -> usize {
        self.0.iter().map(|venue| venue.images.len()).sum()
    }
}
