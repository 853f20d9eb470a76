use crate::domain::model::{DetailRecord, Roster};
use crate::domain::ports::{DetailSource, RosterSource};
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Thin client over the two PokeAPI endpoints the catalog needs.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generation_url(&self, generation: u32) -> String {
        format!("{}/generation/{}", self.base_url, generation)
    }

    fn pokemon_url(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }
}

#[async_trait]
impl RosterSource for PokeApiClient {
    async fn fetch_roster(&self, generation: u32) -> Result<Roster> {
        let url = self.generation_url(generation);
        tracing::debug!("Making roster request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("Roster response status: {}", response.status());

        if !response.status().is_success() {
            return Err(CatalogError::RosterFetchError {
                generation,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Roster>().await?)
    }
}

#[async_trait]
impl DetailSource for PokeApiClient {
    async fn fetch_detail(&self, identifier: &str) -> Result<DetailRecord> {
        let url = self.pokemon_url(identifier);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatusError {
                url,
                status: response.status().as_u16(),
            });
        }

        let data: serde_json::Value = response.json().await?;
        Ok(DetailRecord::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_roster_success() {
        let server = MockServer::start_async().await;
        let roster_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/generation/2");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "id": 2,
                        "name": "generation-ii",
                        "pokemon_species": [
                            {"name": "chikorita", "url": "https://pokeapi.co/api/v2/pokemon-species/152/"},
                            {"name": "togepi", "url": "https://pokeapi.co/api/v2/pokemon-species/175/"}
                        ]
                    }));
            })
            .await;

        let client = PokeApiClient::new(&server.base_url(), None).unwrap();
        let roster = client.fetch_roster(2).await.unwrap();

        roster_mock.assert_async().await;
        assert_eq!(roster.identifiers(), vec!["chikorita", "togepi"]);
    }

    #[tokio::test]
    async fn test_fetch_roster_failure_is_not_retried() {
        let server = MockServer::start_async().await;
        let roster_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/generation/42");
                then.status(404);
            })
            .await;

        let client = PokeApiClient::new(&server.base_url(), None).unwrap();
        let result = client.fetch_roster(42).await;

        assert_eq!(roster_mock.hits_async().await, 1);
        assert!(matches!(
            result,
            Err(CatalogError::RosterFetchError {
                generation: 42,
                status: 404
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_detail_passes_payload_through() {
        let server = MockServer::start_async().await;
        let payload = json!({
            "id": 175,
            "name": "togepi",
            "sprites": {"front_default": "https://img.example/175.png", "back_default": null},
            "abilities": [{"ability": {"name": "hustle"}, "slot": 1}],
            "weight": 15
        });
        let detail_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemon/togepi");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(payload.clone());
            })
            .await;

        let client = PokeApiClient::new(&format!("{}/", server.base_url()), None).unwrap();
        let record = client.fetch_detail("togepi").await.unwrap();

        detail_mock.assert_async().await;
        assert_eq!(record.data, payload);
        assert_eq!(record.ability_names(), vec!["hustle"]);
    }

    #[tokio::test]
    async fn test_fetch_detail_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemon/missingno");
                then.status(500);
            })
            .await;

        let client = PokeApiClient::new(&server.base_url(), None).unwrap();
        let result = client.fetch_detail("missingno").await;

        match result {
            Err(CatalogError::HttpStatusError { url, status }) => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/pokemon/missingno"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2/", None).unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(
            client.pokemon_url("pichu"),
            "https://pokeapi.co/api/v2/pokemon/pichu"
        );
    }
}
