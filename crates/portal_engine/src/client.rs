use std::time::Duration;

use futures_util::StreamExt;
use portal_core::{Draft, ItemId, ListItem, ResourceSpec};
use portal_logging::{portal_debug, portal_info};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::schema::{decode_collection, decode_item, encode_draft};
use crate::{FailureKind, RemoteError};

/// Whether session cookies travel with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CredentialsMode {
    #[default]
    Include,
    Omit,
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub credentials: CredentialsMode,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl ClientSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            credentials: CredentialsMode::Include,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// The remote collection service.
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    async fn list(&self, resource: &ResourceSpec) -> Result<Vec<ListItem>, RemoteError>;

    async fn delete(&self, resource: &ResourceSpec, id: &ItemId) -> Result<(), RemoteError>;

    /// Creates the record when `draft.id` is `None`, otherwise replaces it.
    async fn upsert(&self, resource: &ResourceSpec, draft: &Draft)
        -> Result<ListItem, RemoteError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRemote {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestRemote {
    pub fn new(settings: ClientSettings) -> Result<Self, RemoteError> {
        if settings.base_url.cannot_be_a_base() {
            return Err(RemoteError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .cookie_store(settings.credentials == CredentialsMode::Include)
            .build()
            .map_err(|err| RemoteError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// `{base}/{resource}` or `{base}/{resource}/{id}`.
    fn endpoint(&self, resource: &ResourceSpec, id: Option<&ItemId>) -> Result<Url, RemoteError> {
        let mut url = self.settings.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                RemoteError::new(FailureKind::InvalidUrl, self.settings.base_url.to_string())
            })?;
            segments
                .pop_if_empty()
                .extend(resource.path.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, RemoteError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RemoteError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RemoteError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Remote for ReqwestRemote {
    async fn list(&self, resource: &ResourceSpec) -> Result<Vec<ListItem>, RemoteError> {
        let url = self.endpoint(resource, None)?;
        portal_debug!("GET {}", url);
        let body = self.send(self.client.get(url)).await?;
        let items = decode_collection(resource, &body)?;
        portal_info!("Loaded {} records from {}", items.len(), resource.path);
        Ok(items)
    }

    async fn delete(&self, resource: &ResourceSpec, id: &ItemId) -> Result<(), RemoteError> {
        let url = self.endpoint(resource, Some(id))?;
        portal_debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn upsert(
        &self,
        resource: &ResourceSpec,
        draft: &Draft,
    ) -> Result<ListItem, RemoteError> {
        let url = self.endpoint(resource, draft.id.as_ref())?;
        let body = serde_json::to_vec(&encode_draft(resource.kind, draft))
            .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;
        let request = if draft.is_new() {
            portal_debug!("POST {}", url);
            self.client.post(url)
        } else {
            portal_debug!("PUT {}", url);
            self.client.put(url)
        };
        let response = self
            .send(request.header(CONTENT_TYPE, "application/json").body(body))
            .await?;
        decode_item(resource, &response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::new(FailureKind::Timeout, err.to_string());
    }
    RemoteError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::ResourceKind;
    use pretty_assertions::assert_eq;

    fn remote(base: &str) -> ReqwestRemote {
        ReqwestRemote::new(ClientSettings::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn endpoint_joins_base_path_and_id() {
        let resource = ResourceSpec::new(ResourceKind::Feedback, "feedback", "data");
        let remote = remote("http://localhost:5000/api/professor/");
        assert_eq!(
            remote.endpoint(&resource, None).unwrap().as_str(),
            "http://localhost:5000/api/professor/feedback"
        );
        assert_eq!(
            remote
                .endpoint(&resource, Some(&ItemId::from("a b")))
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/professor/feedback/a%20b"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        let settings = ClientSettings::new(Url::parse("mailto:someone@example.com").unwrap());
        let err = ReqwestRemote::new(settings).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
