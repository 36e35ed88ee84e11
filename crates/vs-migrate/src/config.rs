use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use derive_builder::Builder;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    constants::*,
    error::LoadError,
    throttle::RateLimit,
    venue::Coordinates,
    ApiToken,
};

/// Remote endpoints used by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// WordPress venue listing route, without query string.
    pub source: String,
    /// Base URL of the CMS REST API (collections are appended to it).
    pub cms: String,
    /// Chat-completion endpoint used for geocoding.
    pub geocode: String,
    pub geocode_model: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_URL.to_string(),
            cms: DEFAULT_CMS_BASE_URL.to_string(),
            geocode: DEFAULT_GEOCODE_URL.to_string(),
            geocode_model: DEFAULT_GEOCODE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointConfigError {
    #[error("endpoint {0} is empty")]
    Empty(&'static str),
    #[error("endpoint {0} is not an http(s) URL: {1}")]
    NotHttp(&'static str, String),
}

impl Endpoints {
    pub fn validate(&self) -> Result<(), EndpointConfigError> {
        for (name, url) in [
            ("source", &self.source),
            ("cms", &self.cms),
            ("geocode", &self.geocode),
        ] {
            let url = url.trim();
            if url.is_empty() {
                return Err(EndpointConfigError::Empty(name));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(EndpointConfigError::NotHttp(name, url.to_string()));
            }
        }
        Ok(())
    }
}

/// Local directories shared by the stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Paths {
    pub fn snapshot(&self) -> PathBuf {
        self.output_dir.join(SNAPSHOT_FILE_NAME)
    }
}

/// Slug → coordinates overrides, consulted before any geocoding.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ManualCoords(HashMap<String, Coordinates>);

impl ManualCoords {
    pub fn builtin() -> Self {
        [
            ("dublin-dundrum", 53.2878, -6.2439),
            ("milton-keynes", 52.0406, -0.7594),
            ("london-camden", 51.5408, -0.1434),
            ("altrincham", 53.3879, -2.3487),
            ("belfast", 54.5973, -5.9301),
            ("york", 53.96, -1.0873),
            ("dublin-chatham", 53.3398, -6.2603),
            ("cardiff", 51.4816, -3.1791),
            ("berlin", 52.5009, 13.3759),
            ("aberdeen", 57.1497, -2.0943),
            ("bath", 51.3811, -2.359),
            ("birmingham-the-cube", 52.4781, -1.8904),
            ("birmingham-bullring", 52.4774, -1.895),
            ("bristol", 51.4538, -2.5973),
            ("durham", 54.7753, -1.5849),
            ("edinburgh", 55.9533, -3.1883),
            ("sheffield", 53.3781, -1.469),
            ("london-victoria", 51.4994, -0.1319),
            ("liverpool", 53.4084, -2.9916),
            ("leicester", 52.6369, -1.1398),
            ("newcastle", 54.9783, -1.6178),
            ("manchester-deansgate", 53.4808, -2.2426),
        ]
        .into_iter()
        .map(|(slug, latitude, longitude)| (slug, Coordinates::new(latitude, longitude)))
        .collect()
    }

    /// Load a JSON object of `{"slug": {"latitude": .., "longitude": ..}}`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file_contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&file_contents)?)
    }

    pub fn get(&self, slug: &str) -> Option<Coordinates> {
        self.0.get(slug).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Coordinates)> for ManualCoords {
    fn from_iter<I: IntoIterator<Item = (&'a str, Coordinates)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(slug, coordinates)| (slug.to_string(), coordinates))
                .collect(),
        )
    }
}

/// File extension → MIME type used for media uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimeTable {
    by_extension: HashMap<String, String>,
    fallback: String,
}

impl MimeTable {
    pub fn builtin() -> Self {
        Self::new(
            [
                ("jpg", "image/jpeg"),
                ("jpeg", "image/jpeg"),
                ("png", "image/png"),
                ("webp", "image/webp"),
                ("gif", "image/gif"),
            ],
            "image/jpeg",
        )
    }

    pub fn new<'a, I>(entries: I, fallback: &str) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            by_extension: entries
                .into_iter()
                .map(|(ext, mime)| (ext.to_ascii_lowercase(), mime.to_string()))
                .collect(),
            fallback: fallback.to_string(),
        }
    }

    pub fn for_filename(&self, filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(&ext.to_ascii_lowercase()))
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }
}

/// Everything a stage needs to run.
#[derive(Builder, Clone, Debug)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Settings {
    #[builder(default)]
    pub endpoints: Endpoints,
    #[builder(default)]
    pub cms_token: Option<ApiToken>,
    #[builder(default)]
    pub geocode_key: Option<ApiToken>,
    #[builder(default)]
    pub paths: Paths,
    #[builder(default = "RateLimit::fixed_delay(Duration::from_millis(DEFAULT_DELAY_MS))")]
    pub rate_limit: RateLimit,
    #[builder(default = "ManualCoords::builtin()")]
    pub manual_coords: ManualCoords,
    #[builder(default = "MimeTable::builtin()")]
    pub mime_types: MimeTable,
    /// Keep the image store after an import instead of deleting it.
    #[builder(default)]
    pub keep_image_cache: bool,
}

impl SettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.endpoints {
            Some(endpoints) => endpoints.validate().map_err(|e| e.to_string()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to load the coordinates file {0}: {1}")]
    Coords(PathBuf, #[source] LoadError),
    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsBuilderError),
}

/// Command-line and environment configuration shared by every binary.
#[derive(clap::Args, Clone, Debug)]
pub struct ConfigArgs {
    #[arg(
        long,
        global = true,
        env = "SOURCE_URL",
        default_value = DEFAULT_SOURCE_URL,
        help = "WordPress venue listing endpoint"
    )]
    pub source_url: String,

    #[arg(
        long,
        global = true,
        env = "API_BASE_URL",
        default_value = DEFAULT_CMS_BASE_URL,
        help = "Base URL of the CMS REST API"
    )]
    pub api_base_url: String,

    #[arg(
        long,
        global = true,
        env = "API_TOKEN",
        hide_env_values = true,
        help = "Bearer token for the CMS API"
    )]
    pub api_token: Option<String>,

    #[arg(
        long,
        global = true,
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        help = "Key for the geocoding service. Without it, unmatched venues keep null coordinates."
    )]
    pub openai_api_key: Option<String>,

    #[arg(long, global = true, env = "GEOCODE_URL", default_value = DEFAULT_GEOCODE_URL)]
    pub geocode_url: String,

    #[arg(long, global = true, env = "GEOCODE_MODEL", default_value = DEFAULT_GEOCODE_MODEL)]
    pub geocode_model: String,

    #[arg(long, global = true, default_value = DEFAULT_IMAGES_DIR, help = "Local image store")]
    pub images_dir: PathBuf,

    #[arg(
        long,
        global = true,
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory holding venues.json"
    )]
    pub output_dir: PathBuf,

    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_DELAY_MS,
        help = "Pause between venues in milliseconds (0 disables)"
    )]
    pub delay_ms: u64,

    #[arg(long, global = true, help = "JSON file replacing the built-in slug → coordinates table")]
    pub coords_file: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let manual_coords = match &self.coords_file {
            Some(path) => {
                ManualCoords::load(path).map_err(|e| ConfigError::Coords(path.clone(), e))?
            }
            None => ManualCoords::builtin(),
        };
        let settings = SettingsBuilder::default()
            .endpoints(Endpoints {
                source: self.source_url,
                cms: self.api_base_url,
                geocode: self.geocode_url,
                geocode_model: self.geocode_model,
            })
            .cms_token(ApiToken::from_optional(self.api_token.as_deref()))
            .geocode_key(ApiToken::from_optional(self.openai_api_key.as_deref()))
            .paths(Paths {
                images_dir: self.images_dir,
                output_dir: self.output_dir,
            })
            .rate_limit(RateLimit::fixed_delay(Duration::from_millis(self.delay_ms)))
            .manual_coords(manual_coords)
            .build()?;
        Ok(settings)
    }
}

/// Load `.env` from the working directory if present. Returns the file used.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}
