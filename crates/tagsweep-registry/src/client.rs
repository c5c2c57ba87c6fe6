//! HTTP client for the Docker Registry API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use tagsweep_core::{Error, Registry, Result};

const MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
const DIGEST_HEADER: &str = "Docker-Content-Digest";

/// Connection settings for one registry endpoint.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Registry base URL, e.g. `https://registry.example.com`.
    pub base_url: String,
    /// Username for HTTP Basic authentication.
    pub username: Option<String>,
    /// Password for HTTP Basic authentication.
    pub password: Option<String>,
}

/// Registry client speaking the Docker Registry HTTP API v2.
pub struct DistributionClient {
    client: Client,
    config: RegistryConfig,
}

impl DistributionClient {
    /// Creates a new registry client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::registry_with_source("failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    fn v2_url(&self, path: &str) -> String {
        format!("{}/v2/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.username {
            Some(username) => req.basic_auth(username, self.config.password.as_deref()),
            None => req,
        }
    }

    /// Resolves a tag to its content digest via a manifest HEAD request.
    async fn resolve_digest(&self, repository: &str, tag: &str) -> Result<String> {
        let url = self.v2_url(&format!("{repository}/manifests/{tag}"));
        let response = self
            .authed(self.client.head(&url).header("Accept", MANIFEST_V2))
            .send()
            .await
            .map_err(|e| Error::Digest {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Digest {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: format!("manifest HEAD returned {}", response.status()),
            });
        }

        response
            .headers()
            .get(DIGEST_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| Error::Digest {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: format!("missing {DIGEST_HEADER} header"),
            })
    }
}

#[async_trait]
impl Registry for DistributionClient {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        let url = self.v2_url("_catalog");
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::catalog(e.to_string()))?;

        if response.status().is_success() {
            let catalog: CatalogResponse = response
                .json()
                .await
                .map_err(|e| Error::catalog(format!("malformed catalog response: {e}")))?;
            Ok(catalog.repositories)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::catalog(format!("{status}: {body}")))
        }
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        let url = self.v2_url(&format!("{repository}/tags/list"));
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::tag_list(repository, e.to_string()))?;

        if response.status().is_success() {
            let tags: TagListResponse = response
                .json()
                .await
                .map_err(|e| Error::tag_list(repository, format!("malformed tag list: {e}")))?;
            // The registry reports null instead of [] for untagged repositories.
            Ok(tags.tags.unwrap_or_default())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::tag_list(repository, format!("{status}: {body}")))
        }
    }

    async fn creation_time(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        // Best-effort: manifest -> config blob -> created field. Any failure
        // along the way degrades to Unknown rather than erroring.
        let url = self.v2_url(&format!("{repository}/manifests/{tag}"));
        let manifest: ManifestV2 = match self
            .authed(self.client.get(&url).header("Accept", MANIFEST_V2))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => match response.json().await {
                Ok(manifest) => manifest,
                Err(e) => {
                    tracing::debug!(repository, tag, error = %e, "unparseable manifest");
                    return Ok(None);
                }
            },
            Ok(response) => {
                tracing::debug!(repository, tag, status = %response.status(), "manifest fetch refused");
                return Ok(None);
            }
            Err(e) => {
                tracing::debug!(repository, tag, error = %e, "manifest fetch failed");
                return Ok(None);
            }
        };

        let url = self.v2_url(&format!("{repository}/blobs/{}", manifest.config.digest));
        match self.authed(self.client.get(&url)).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<ConfigBlob>().await {
                    Ok(blob) => Ok(blob.created),
                    Err(e) => {
                        tracing::debug!(repository, tag, error = %e, "unparseable config blob");
                        Ok(None)
                    }
                }
            }
            Ok(response) => {
                tracing::debug!(repository, tag, status = %response.status(), "config blob refused");
                Ok(None)
            }
            Err(e) => {
                tracing::debug!(repository, tag, error = %e, "config blob fetch failed");
                Ok(None)
            }
        }
    }

    async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()> {
        let digest = self.resolve_digest(repository, tag).await?;

        let url = self.v2_url(&format!("{repository}/manifests/{digest}"));
        let response = self
            .authed(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| Error::Delete {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: e.to_string(),
            })?;

        // 202 Accepted on success.
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Delete {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: format!("{status}: {body}"),
            })
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// `GET /v2/_catalog` response body.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    repositories: Vec<String>,
}

/// `GET /v2/{repo}/tags/list` response body.
#[derive(Debug, Deserialize)]
struct TagListResponse {
    tags: Option<Vec<String>>,
}

/// The slice of a v2 manifest needed to reach the image config.
#[derive(Debug, Deserialize)]
struct ManifestV2 {
    config: DescriptorRef,
}

#[derive(Debug, Deserialize)]
struct DescriptorRef {
    digest: String,
}

/// The slice of an image config blob carrying the build timestamp.
#[derive(Debug, Deserialize)]
struct ConfigBlob {
    created: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> DistributionClient {
        DistributionClient::new(RegistryConfig {
            base_url: base_url.to_string(),
            username: None,
            password: None,
        })
        .expect("client")
    }

    #[test]
    fn v2_url_joins_and_normalizes() {
        let plain = client("http://localhost:5000");
        assert_eq!(
            plain.v2_url("app/api/tags/list"),
            "http://localhost:5000/v2/app/api/tags/list"
        );

        let trailing = client("http://localhost:5000/");
        assert_eq!(trailing.v2_url("_catalog"), "http://localhost:5000/v2/_catalog");
    }

    #[test]
    fn tag_list_null_means_empty() {
        let parsed: TagListResponse =
            serde_json::from_str(r#"{"name":"app/api","tags":null}"#).expect("parse");
        assert!(parsed.tags.unwrap_or_default().is_empty());

        let parsed: TagListResponse =
            serde_json::from_str(r#"{"name":"app/api","tags":["1.0.0"]}"#).expect("parse");
        assert_eq!(parsed.tags.unwrap_or_default(), vec!["1.0.0"]);
    }

    #[test]
    fn catalog_defaults_missing_repositories() {
        let parsed: CatalogResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.repositories.is_empty());
    }

    #[test]
    fn config_blob_created_parses_rfc3339() {
        let parsed: ConfigBlob =
            serde_json::from_str(r#"{"created":"2015-10-31T22:22:56.015925234Z","os":"linux"}"#)
                .expect("parse");
        assert!(parsed.created.is_some());

        let parsed: ConfigBlob = serde_json::from_str(r#"{"os":"linux"}"#).expect("parse");
        assert!(parsed.created.is_none());
    }
}
