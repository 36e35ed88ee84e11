use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api_interfaces::cms::{Doc, DocId, ListResponse, WriteResponse},
    error::ApiError,
    util::{trim_base, with_token},
    venue::{CmsImageKind, Position, Venue},
    ApiToken,
};

/// Collections the pipeline touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Venues,
    Media,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Venues => "/venues",
            Self::Media => "/media",
        }
    }
}

/// An image slot on a CMS venue, pointing at an uploaded media document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CmsImage {
    #[serde(rename = "type")]
    pub kind: CmsImageKind,
    pub image: DocId,
}

/// Venue body sent on create and update. Every field is sent, so an update
/// replaces whatever the target held before.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CmsVenue {
    pub title: String,
    pub slug: String,
    pub hero_title: String,
    pub description: String,
    pub address: String,
    #[serde(flatten)]
    pub position: Position,
    pub phone: String,
    pub email: String,
    pub booking_url: String,
    pub menu_url: String,
    pub opening_hours: String,
    pub images: Vec<CmsImage>,
}

impl CmsVenue {
    pub fn from_venue(venue: &Venue, images: Vec<CmsImage>) -> Self {
        Self {
            title: venue.title.clone(),
            slug: venue.slug.clone(),
            hero_title: venue.hero_title.clone(),
            description: venue.description.clone(),
            address: venue.address.clone(),
            position: venue.position,
            phone: venue.phone.clone(),
            email: venue.email.clone(),
            booking_url: venue.booking_url.clone(),
            menu_url: venue.menu_url.clone(),
            opening_hours: venue.opening_hours.clone(),
            images,
        }
    }
}

/// A file to upload to the media collection.
#[derive(Debug)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub alt: String,
}

/// Client for the CMS REST API.
#[derive(Clone, Debug)]
pub struct CmsClient {
    http_client: Client,
    base_url: String,
    token: Option<ApiToken>,
}

impl CmsClient {
    pub fn new(http_client: Client, base_url: &str, token: Option<ApiToken>) -> Self {
        Self {
            http_client,
            base_url: trim_base(base_url),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let request = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        with_token(request, self.token.as_ref())
    }

    /// Cheap authenticated read used to decide whether the API is usable.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let request = self
            .request(reqwest::Method::GET, Collection::Venues.path())
            .query(&[("limit", "1")]);
        let _: ListResponse = send(request).await?;
        Ok(())
    }

    pub async fn find_venue_by_slug(&self, slug: &str) -> Result<Option<Doc>, ApiError> {
        let request = self
            .request(reqwest::Method::GET, Collection::Venues.path())
            .query(&[("where[slug][equals]", slug), ("limit", "1")]);
        let listing: ListResponse = send(request).await?;
        Ok(listing.docs.into_iter().next())
    }

    pub async fn create_venue(&self, venue: &CmsVenue) -> Result<DocId, ApiError> {
        let request = self
            .request(reqwest::Method::POST, Collection::Venues.path())
            .json(venue);
        written_id(send(request).await?)
    }

    pub async fn update_venue(&self, id: &DocId, venue: &CmsVenue) -> Result<DocId, ApiError> {
        let path = format!("{}/{id}", Collection::Venues.path());
        let request = self.request(reqwest::Method::PATCH, &path).json(venue);
        let response: WriteResponse = send(request).await?;
        Ok(response.doc_id().cloned().unwrap_or_else(|| id.clone()))
    }

    pub async fn list(&self, collection: Collection, limit: u32) -> Result<Vec<Doc>, ApiError> {
        let request = self
            .request(reqwest::Method::GET, collection.path())
            .query(&[("limit", limit)]);
        let listing: ListResponse = send(request).await?;
        Ok(listing.docs)
    }

    pub async fn delete(&self, collection: Collection, id: &DocId) -> Result<(), ApiError> {
        let path = format!("{}/{id}", collection.path());
        let response = checked(self.request(reqwest::Method::DELETE, &path)).await?;
        // Body is informational only.
        let _ = response.bytes().await;
        Ok(())
    }

    /// Upload one file as multipart form data (`file` + `alt`).
    pub async fn upload_media(&self, upload: MediaUpload) -> Result<DocId, ApiError> {
        let file = multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&upload.mime_type)?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("alt", upload.alt);
        let request = self
            .request(reqwest::Method::POST, Collection::Media.path())
            .multipart(form);
        written_id(send(request).await?)
    }
}

fn written_id(response: WriteResponse) -> Result<DocId, ApiError> {
    response.doc_id().cloned().ok_or(ApiError::MissingId)
}

async fn checked(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::ResponseError(status, body));
    }
    Ok(response)
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = checked(request).await?;
    let body = response.text().await.map_err(ApiError::ResponseBodyError)?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::Coordinates;
    use httpmock::prelude::*;
    use serde_json::json;

    const FAKE_TOKEN: &str = "cms-token";

    fn client(server: &MockServer, token: Option<&str>) -> CmsClient {
        CmsClient::new(
            reqwest::Client::new(),
            &server.url("/api/"),
            token.map(ApiToken::from_raw),
        )
    }

    fn cms_venue() -> CmsVenue {
        CmsVenue {
            title: "York".to_string(),
            slug: "york".to_string(),
            hero_title: String::new(),
            description: String::new(),
            address: "Coney Street".to_string(),
            position: Some(Coordinates::new(53.96, -1.0873)).into(),
            phone: String::new(),
            email: String::new(),
            booking_url: String::new(),
            menu_url: String::new(),
            opening_hours: String::new(),
            images: vec![CmsImage {
                kind: CmsImageKind::FindUs,
                image: DocId::Text("m1".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn ping_sends_bearer_token() {
        // Arrange
        let server = MockServer::start_async().await;
        let ping_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/venues")
                    .query_param("limit", "1")
                    .header("Authorization", format!("Bearer {FAKE_TOKEN}"));
                then.status(200).json_body(json!({ "docs": [] }));
            })
            .await;

        // Act
        let result = client(&server, Some(FAKE_TOKEN)).ping().await;

        // Assert
        assert!(result.is_ok(), "Failed to ping: {:?}", result.unwrap_err());
        ping_mock.assert();
    }

    #[tokio::test]
    async fn requests_without_token_are_unauthenticated() {
        // Arrange
        let server = MockServer::start_async().await;
        let authed_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/venues").header_exists("Authorization");
                then.status(500);
            })
            .await;
        let anonymous_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/venues");
                then.status(200).json_body(json!({ "docs": [] }));
            })
            .await;

        // Act
        let result = client(&server, None).ping().await;

        // Assert
        assert!(result.is_ok());
        authed_mock.assert_hits(0);
        anonymous_mock.assert();
    }

    #[tokio::test]
    async fn ping_bad_status() {
        // Arrange
        let server = MockServer::start_async().await;
        let ping_mock = server
            .mock_async(|when, then| {
                when.path("/api/venues");
                then.status(403).body("forbidden");
            })
            .await;

        // Act
        let result = client(&server, None).ping().await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            ApiError::ResponseError(status, _) if status.as_u16() == 403
        ));
        ping_mock.assert();
    }

    #[tokio::test]
    async fn find_venue_by_slug_matches_exactly() {
        // Arrange
        let server = MockServer::start_async().await;
        let find_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/venues")
                    .query_param("where[slug][equals]", "london-camden")
                    .query_param("limit", "1");
                then.status(200).json_body(json!({
                    "docs": [{ "id": "v42", "slug": "london-camden", "title": "Camden" }],
                    "totalDocs": 1
                }));
            })
            .await;

        // Act
        let found = client(&server, None)
            .find_venue_by_slug("london-camden")
            .await
            .unwrap();

        // Assert
        let found = found.expect("venue should be found");
        assert_eq!(found.doc_id(), Some(&DocId::Text("v42".to_string())));
        find_mock.assert();
    }

    #[tokio::test]
    async fn create_venue_posts_full_body() {
        // Arrange
        let server = MockServer::start_async().await;
        let create_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/venues")
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "title": "York",
                        "slug": "york",
                        "hero_title": "",
                        "description": "",
                        "address": "Coney Street",
                        "latitude": 53.96,
                        "longitude": -1.0873,
                        "phone": "",
                        "email": "",
                        "booking_url": "",
                        "menu_url": "",
                        "opening_hours": "",
                        "images": [{ "type": "find_us", "image": "m1" }]
                    }));
                then.status(201)
                    .json_body(json!({ "message": "Venue successfully created.", "doc": { "id": "v1" } }));
            })
            .await;

        // Act
        let id = client(&server, None).create_venue(&cms_venue()).await;

        // Assert
        assert_eq!(id.unwrap(), DocId::Text("v1".to_string()));
        create_mock.assert();
    }

    #[tokio::test]
    async fn update_venue_patches_by_id() {
        // Arrange
        let server = MockServer::start_async().await;
        let update_mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH).path("/api/venues/7");
                then.status(200).json_body(json!({ "doc": { "id": 7 } }));
            })
            .await;

        // Act
        let id = client(&server, None)
            .update_venue(&DocId::Number(7), &cms_venue())
            .await;

        // Assert
        assert_eq!(id.unwrap(), DocId::Number(7));
        update_mock.assert();
    }

    #[tokio::test]
    async fn upload_media_sends_multipart() {
        // Arrange
        let server = MockServer::start_async().await;
        let upload_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/media")
                    .header_exists("Content-Type")
                    .body_contains("name=\"file\"")
                    .body_contains("filename=\"york-map.jpg\"")
                    .body_contains("name=\"alt\"")
                    .body_contains("map for York");
                then.status(201).json_body(json!({ "doc": { "id": "media-1" } }));
            })
            .await;
        let upload = MediaUpload {
            bytes: b"fake-jpeg".to_vec(),
            filename: "york-map.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            alt: "map for York".to_string(),
        };

        // Act
        let id = client(&server, None).upload_media(upload).await;

        // Assert
        assert_eq!(id.unwrap(), DocId::Text("media-1".to_string()));
        upload_mock.assert();
    }

    #[tokio::test]
    async fn upload_without_id_is_an_error() {
        // Arrange
        let server = MockServer::start_async().await;
        let upload_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/media");
                then.status(201).json_body(json!({ "message": "ok" }));
            })
            .await;
        let upload = MediaUpload {
            bytes: vec![1, 2, 3],
            filename: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            alt: "hero_logo for A".to_string(),
        };

        // Act
        let id = client(&server, None).upload_media(upload).await;

        // Assert
        assert!(matches!(id.unwrap_err(), ApiError::MissingId));
        upload_mock.assert();
    }

    #[tokio::test]
    async fn list_and_delete() {
        // Arrange
        let server = MockServer::start_async().await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/media").query_param("limit", "1000");
                then.status(200)
                    .json_body(json!({ "docs": [{ "id": "a" }, { "id": "b" }] }));
            })
            .await;
        let delete_mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/media/a");
                then.status(200).json_body(json!({ "id": "a" }));
            })
            .await;
        let cms = client(&server, None);

        // Act
        let docs = cms.list(Collection::Media, 1000).await.unwrap();
        let deleted = cms.delete(Collection::Media, docs[0].doc_id().unwrap()).await;

        // Assert
        assert_eq!(docs.len(), 2);
        assert!(deleted.is_ok());
        list_mock.assert();
        delete_mock.assert();
    }
}
