//! HTTP client for the local REST API.
//!
//! Implements the core's [`PageSource`] and [`ObjectSource`] contracts.
//! Non-success statuses become [`Error::Api`]; a 404 becomes
//! [`Error::NotFound`] so callers can prune stale references.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use anyview_core::defaults;
use anyview_core::{
    CreateObjectRequest, Error, ObjectSource, Page, PageKind, PageRequest, PageSource,
    PaginatedResponse, RawEntity, RawMember, RawObject, RawProperty, RawSpace, RawType, Result,
    SortField,
};

use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    pub property_key: SortField,
    pub direction: SortDirection,
}

impl SortOptions {
    /// Name sorts ascending, date sorts newest first.
    pub fn for_field(field: SortField) -> Self {
        let direction = match field {
            SortField::Name => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        Self {
            property_key: field,
            direction,
        }
    }
}

/// Body of the space and global search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchRequest {
    pub query: String,
    /// Type keys to restrict to; empty searches every type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOptions>,
}

#[derive(Deserialize)]
struct ObjectEnvelope {
    object: RawObject,
}

#[derive(Deserialize)]
struct SpaceEnvelope {
    space: RawSpace,
}

#[derive(Deserialize)]
struct TypeEnvelope {
    #[serde(rename = "type")]
    object_type: RawType,
}

#[derive(Deserialize)]
struct MemberEnvelope {
    member: RawMember,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn into_page<T>(response: PaginatedResponse<T>, wrap: fn(T) -> RawEntity) -> Page<RawEntity> {
    Page {
        items: response.data.into_iter().map(wrap).collect(),
        has_more: response.pagination.has_more,
    }
}

/// Client for the local REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let version_header = HeaderName::from_bytes(defaults::API_VERSION_HEADER.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid API version header name: {}", e)))?;
        headers.insert(
            version_header,
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| Error::Config(format!("Invalid API version header: {}", e)))?,
        );
        if let Some(key) = &config.app_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| Error::Config(format!("Invalid app key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            component = "client",
            base_url = %config.base_url,
            api_version = %config.api_version,
            authenticated = config.app_key.is_some(),
            "API client ready"
        );

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::load())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, op: &str, request: RequestBuilder) -> Result<T> {
        let start = Instant::now();
        let response = request.send().await?;
        let response = check_status(response).await?;
        let body = response.json::<T>().await?;
        debug!(
            component = "client",
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            "Request complete"
        );
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, op: &str, path: &str) -> Result<T> {
        self.send(op, self.client.get(self.url(path))).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        op: &str,
        path: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PaginatedResponse<T>> {
        let request = self
            .client
            .get(self.url(path))
            .query(&[("offset", offset), ("limit", limit)]);
        self.send(op, request).await
    }

    pub async fn list_spaces(&self, offset: usize, limit: usize) -> Result<PaginatedResponse<RawSpace>> {
        self.get_list("list_spaces", "/spaces", offset, limit).await
    }

    pub async fn get_space(&self, space_id: &str) -> Result<RawSpace> {
        let envelope: SpaceEnvelope = self
            .get("get_space", &format!("/spaces/{}", space_id))
            .await?;
        Ok(envelope.space)
    }

    pub async fn get_type(&self, space_id: &str, type_id: &str) -> Result<RawType> {
        let envelope: TypeEnvelope = self
            .get("get_type", &format!("/spaces/{}/types/{}", space_id, type_id))
            .await?;
        Ok(envelope.object_type)
    }

    pub async fn get_member(&self, space_id: &str, member_id: &str) -> Result<RawMember> {
        let envelope: MemberEnvelope = self
            .get(
                "get_member",
                &format!("/spaces/{}/members/{}", space_id, member_id),
            )
            .await?;
        Ok(envelope.member)
    }

    /// Search objects within one space.
    pub async fn search(
        &self,
        space_id: &str,
        search: &SearchRequest,
        offset: usize,
        limit: usize,
    ) -> Result<Page<RawObject>> {
        self.post_search("search", &format!("/spaces/{}/search", space_id), search, offset, limit)
            .await
    }

    /// Search objects across all spaces.
    pub async fn global_search(
        &self,
        search: &SearchRequest,
        offset: usize,
        limit: usize,
    ) -> Result<Page<RawObject>> {
        self.post_search("global_search", "/search", search, offset, limit)
            .await
    }

    async fn post_search(
        &self,
        op: &str,
        path: &str,
        search: &SearchRequest,
        offset: usize,
        limit: usize,
    ) -> Result<Page<RawObject>> {
        let request = self
            .client
            .post(self.url(path))
            .query(&[("offset", offset), ("limit", limit)])
            .json(search);
        let response: PaginatedResponse<RawObject> = self.send(op, request).await?;
        debug!(
            component = "client",
            op,
            result_count = response.data.len(),
            has_more = response.pagination.has_more,
            "Search page received"
        );
        Ok(Page {
            items: response.data,
            has_more: response.pagination.has_more,
        })
    }

    pub async fn create_object(
        &self,
        space_id: &str,
        request: &CreateObjectRequest,
    ) -> Result<RawObject> {
        let builder = self
            .client
            .post(self.url(&format!("/spaces/{}/objects", space_id)))
            .json(request);
        let envelope: ObjectEnvelope = self.send("create_object", builder).await?;
        info!(
            component = "client",
            space_id,
            object_id = %envelope.object.id,
            type_key = %request.type_key,
            "Object created"
        );
        Ok(envelope.object)
    }
}

/// Turn a non-success response into an error, keeping the API's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    debug!(component = "client", status = status.as_u16(), error = %message, "API error response");
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(message));
    }
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(&self, req: PageRequest) -> Result<Page<RawEntity>> {
        let space = &req.scope_id;
        let (offset, limit) = (req.offset, req.limit);
        let page = match &req.kind {
            PageKind::Spaces => into_page(self.list_spaces(offset, limit).await?, RawEntity::Space),
            PageKind::Objects => into_page(
                self.get_list::<RawObject>(
                    "list_objects",
                    &format!("/spaces/{}/objects", space),
                    offset,
                    limit,
                )
                .await?,
                RawEntity::Object,
            ),
            PageKind::Types => into_page(
                self.get_list::<RawType>(
                    "list_types",
                    &format!("/spaces/{}/types", space),
                    offset,
                    limit,
                )
                .await?,
                RawEntity::Type,
            ),
            PageKind::Members => into_page(
                self.get_list::<RawMember>(
                    "list_members",
                    &format!("/spaces/{}/members", space),
                    offset,
                    limit,
                )
                .await?,
                RawEntity::Member,
            ),
            PageKind::Properties => into_page(
                self.get_list::<RawProperty>(
                    "list_properties",
                    &format!("/spaces/{}/properties", space),
                    offset,
                    limit,
                )
                .await?,
                RawEntity::Property,
            ),
            PageKind::Templates { type_id } => into_page(
                self.get_list::<RawObject>(
                    "list_templates",
                    &format!("/spaces/{}/types/{}/templates", space, type_id),
                    offset,
                    limit,
                )
                .await?,
                RawEntity::Object,
            ),
        };
        debug!(
            component = "client",
            space_id = %space,
            offset,
            limit,
            result_count = page.items.len(),
            has_more = page.has_more,
            "Fetched page"
        );
        Ok(page)
    }
}

#[async_trait]
impl ObjectSource for ApiClient {
    async fn get_object(&self, space_id: &str, object_id: &str) -> Result<RawObject> {
        let envelope: ObjectEnvelope = self
            .get(
                "get_object",
                &format!("/spaces/{}/objects/{}", space_id, object_id),
            )
            .await?;
        Ok(envelope.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_wire_shape() {
        let request = SearchRequest {
            query: "plan".to_string(),
            types: vec![],
            sort: Some(SortOptions::for_field(SortField::LastModifiedDate)),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "query": "plan",
                "sort": {"property_key": "last_modified_date", "direction": "desc"}
            })
        );
    }

    #[test]
    fn test_name_sort_is_ascending() {
        assert_eq!(
            SortOptions::for_field(SortField::Name).direction,
            SortDirection::Asc
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ClientConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(matches!(ApiClient::new(config), Err(Error::Config(_))));
    }
}
