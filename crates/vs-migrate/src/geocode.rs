use std::fmt;

use reqwest::Client;

use crate::{
    api_interfaces::openai::{ChatMessage, ChatRequest, ChatResponse, CoordinateAnswer},
    config::{Endpoints, ManualCoords},
    constants::{GEOCODE_MAX_TOKENS, GEOCODE_SYSTEM_PROMPT},
    error::GeocodeError,
    venue::Coordinates,
    ApiToken,
};

/// Natural-language geocoding through a chat-completion endpoint.
#[derive(Clone, Debug)]
pub struct Geocoder {
    http_client: Client,
    endpoint: String,
    model: String,
    key: ApiToken,
}

impl Geocoder {
    pub fn new(http_client: Client, endpoint: &str, model: &str, key: ApiToken) -> Self {
        Self {
            http_client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            key,
        }
    }

    /// Build a geocoder from the configured endpoints, if a key is available.
    pub fn from_endpoints(
        http_client: Client,
        endpoints: &Endpoints,
        key: Option<&ApiToken>,
    ) -> Option<Self> {
        key.map(|key| {
            Self::new(
                http_client,
                &endpoints.geocode,
                &endpoints.geocode_model,
                key.clone(),
            )
        })
    }

    /// Ask the model for the coordinates of `address`. One attempt, no retries.
    pub async fn locate(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: GEOCODE_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Coordinates for: {address}"),
                },
            ],
            temperature: 0.0,
            max_tokens: GEOCODE_MAX_TOKENS,
        };
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.key.get())
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GeocodeError::ResponseError(response.status()));
        }
        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let content = parsed.first_content().ok_or(GeocodeError::EmptyContent)?;
        parse_answer(content)
    }
}

/// Both values must be present and non-zero.
fn parse_answer(content: &str) -> Result<Coordinates, GeocodeError> {
    let answer: CoordinateAnswer = serde_json::from_str(content)?;
    match (answer.latitude, answer.longitude) {
        (Some(latitude), Some(longitude)) if usable(latitude) && usable(longitude) => {
            Ok(Coordinates::new(latitude, longitude))
        }
        _ => Err(GeocodeError::MissingCoordinates),
    }
}

fn usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Where a venue's coordinates came from.
#[derive(Clone, Debug, PartialEq)]
pub enum CoordinateSource {
    Manual,
    Geocoded,
    Unresolved(Unresolved),
}

/// Why a venue was left without coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unresolved {
    NoAddress,
    GeocodingDisabled,
    /// The service answered, but not with usable coordinates.
    BadAnswer(String),
    /// The request failed or the service returned an error status.
    RequestFailed(String),
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAddress => f.write_str("no address"),
            Self::GeocodingDisabled => f.write_str("geocoding disabled"),
            Self::BadAnswer(reason) | Self::RequestFailed(reason) => f.write_str(reason),
        }
    }
}

impl From<GeocodeError> for Unresolved {
    fn from(e: GeocodeError) -> Self {
        if e.is_parse_failure() {
            Self::BadAnswer(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub coordinates: Option<Coordinates>,
    pub source: CoordinateSource,
}

impl Resolution {
    fn unresolved(reason: impl Into<Unresolved>) -> Self {
        Self {
            coordinates: None,
            source: CoordinateSource::Unresolved(reason.into()),
        }
    }
}

/// Manual table first, then geocoding of the address, else null coordinates.
#[derive(Clone, Debug)]
pub struct CoordinateResolver {
    manual: ManualCoords,
    geocoder: Option<Geocoder>,
}

impl CoordinateResolver {
    pub fn new(manual: ManualCoords, geocoder: Option<Geocoder>) -> Self {
        Self { manual, geocoder }
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    pub async fn resolve(&self, slug: &str, address: Option<&str>) -> Resolution {
        if let Some(coordinates) = self.manual.get(slug) {
            return Resolution {
                coordinates: Some(coordinates),
                source: CoordinateSource::Manual,
            };
        }
        let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
            return Resolution::unresolved(Unresolved::NoAddress);
        };
        let Some(geocoder) = &self.geocoder else {
            return Resolution::unresolved(Unresolved::GeocodingDisabled);
        };
        match geocoder.locate(address).await {
            Ok(coordinates) => Resolution {
                coordinates: Some(coordinates),
                source: CoordinateSource::Geocoded,
            },
            Err(e) => Resolution::unresolved(e),
        }
    }
}
