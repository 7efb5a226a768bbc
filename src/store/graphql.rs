use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{Artifact, HasMetadata, Package, Snapshot};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ARTIFACTS_QUERY: &str = "query { artifacts(artifactSpec: {}) { id algorithm digest } }";

const HAS_METADATA_QUERY: &str = "query { HasMetadata(hasMetadataSpec: {}) { \
    id key value timestamp justification origin collector documentRef } }";

const PACKAGES_QUERY: &str = "query { packages(pkgSpec: {}) { id type namespaces { \
    id namespace names { id name versions { id purl version qualifiers { key value } subpath } } } } }";

/// Store reading from a GUAC GraphQL endpoint, e.g. `http://localhost:8080/query`.
pub struct GraphqlStore {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ArtifactsData {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct HasMetadataData {
    #[serde(rename = "HasMetadata")]
    has_metadata: Vec<HasMetadata>,
}

#[derive(Debug, Deserialize)]
struct PackagesData {
    packages: Vec<Package>,
}

impl<T> GraphqlResponse<T> {
    /// Any reported error fails the whole response; partial data is discarded.
    fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            bail!("GraphQL error: {}", messages.join("; "));
        }
        self.data
            .ok_or_else(|| anyhow!("GraphQL response carried no data"))
    }
}

impl GraphqlStore {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("guacid-communities/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        debug!("POST {} {}", self.endpoint, query);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .with_context(|| format!("unable to reach {}", self.endpoint))?
            .error_for_status()?;

        let body: GraphqlResponse<T> = response.json().await?;
        body.into_data()
    }
}

impl super::IdentifierStore for GraphqlStore {
    async fn fetch(&self) -> Result<Snapshot> {
        let (artifacts, metadata, packages) = futures::try_join!(
            async {
                self.query::<ArtifactsData>(ARTIFACTS_QUERY)
                    .await
                    .context("unable to get artifact list")
            },
            async {
                self.query::<HasMetadataData>(HAS_METADATA_QUERY)
                    .await
                    .context("unable to get hasMetadata list")
            },
            async {
                self.query::<PackagesData>(PACKAGES_QUERY)
                    .await
                    .context("unable to get package list")
            },
        )?;

        info!(
            "fetched from {}: {} artifacts, {} metadata, {} packages",
            self.endpoint,
            artifacts.artifacts.len(),
            metadata.has_metadata.len(),
            packages.packages.len()
        );

        Ok(Snapshot {
            artifacts: artifacts.artifacts,
            metadata: metadata.has_metadata,
            packages: packages.packages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_packages_response() {
        let body = r#"{
  "data": {
    "packages": [
      {
        "id": "1",
        "type": "pypi",
        "namespaces": [
          { "id": "2", "namespace": "", "names": [
            { "id": "3", "name": "requests", "versions": [
              { "id": "4", "purl": "pkg:pypi/requests@2.31.0", "version": "2.31.0", "qualifiers": [], "subpath": "" }
            ] }
          ] }
        ]
      }
    ]
  }
}"#;
        let response: GraphqlResponse<PackagesData> = serde_json::from_str(body).unwrap();
        let data = response.into_data().unwrap();
        assert_eq!(data.packages[0].pkg_type, "pypi");
        assert_eq!(data.packages[0].namespaces[0].names[0].versions[0].version, "2.31.0");
    }

    #[test]
    fn test_decode_metadata_response() {
        let body = r#"{ "data": { "HasMetadata": [
            { "id": "7", "key": "cpe", "value": "cpe:/a:x:y:1:u", "documentRef": "d" }
        ] } }"#;
        let response: GraphqlResponse<HasMetadataData> = serde_json::from_str(body).unwrap();
        let data = response.into_data().unwrap();
        assert_eq!(data.has_metadata[0].value, "cpe:/a:x:y:1:u");
    }

    #[test]
    fn test_errors_are_fatal() {
        let body = r#"{ "data": null, "errors": [ { "message": "no such field" } ] }"#;
        let response: GraphqlResponse<ArtifactsData> = serde_json::from_str(body).unwrap();
        let err = response.into_data().unwrap_err();
        assert!(err.to_string().contains("no such field"));

        let empty: GraphqlResponse<ArtifactsData> = serde_json::from_str("{}").unwrap();
        assert!(empty.into_data().is_err());
    }

    #[test]
    fn test_new_accepts_endpoint() {
        let store = GraphqlStore::new("http://localhost:8080/query").unwrap();
        assert_eq!(store.endpoint, "http://localhost:8080/query");
    }
}
