use std::time::Duration;

use entsync_engine::{Entity, EntityStore, IdAllocator, SyncError};

const USER_AGENT: &str = concat!("entsync/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 30;

/// Blocking client for the entity store API.
///
/// One client per run; the engine borrows it as both [`EntityStore`]
/// and [`IdAllocator`]. No client-side retry: transient failures
/// surface as hard errors, the engine's two-pass scheme is the only
/// replay mechanism.
pub struct StoreClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

impl EntityStore for StoreClient {
    fn find(
        &self,
        field: &str,
        value: &str,
        entity_type: &str,
    ) -> Result<Option<Entity>, SyncError> {
        let url = format!("{}/v3/entity/{}", self.base_url, entity_type);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("x-apikey", &self.api_key)
            .query(&[
                ("filterfield", field),
                ("filtervalue", value),
                ("take", "1"),
                ("includedisabled", "true"),
            ])
            .send()
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 => {
                let items: Vec<serde_json::Value> = response
                    .json()
                    .map_err(|e| SyncError::Parse(format!("lookup response: {e}")))?;
                match items.into_iter().next() {
                    None => Ok(None),
                    Some(item) => serde_json::from_value(item)
                        .map(Some)
                        .map_err(|e| SyncError::Parse(format!("lookup result: {e}"))),
                }
            }
            404 => Ok(None),
            _ => Err(SyncError::Lookup {
                status,
                body: response.text().unwrap_or_default(),
            }),
        }
    }

    fn write(&self, entity_type: &str, id: &str, entity: &Entity) -> Result<(), SyncError> {
        let url = format!("{}/entity/{}/{}", self.base_url, entity_type, id);
        let response = self
            .http
            .put(&url)
            .header("x-apikey", &self.api_key)
            .json(entity)
            .send()
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SyncError::Write {
                status,
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl IdAllocator for StoreClient {
    fn allocate(&self, count: usize) -> Result<Vec<String>, SyncError> {
        let url = format!("{}/id", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("x-apikey", &self.api_key)
            .query(&[("count", count.to_string())])
            .send()
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SyncError::Allocation {
                status,
                body: response.text().unwrap_or_default(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| SyncError::Parse(format!("allocator response: {e}")))?;
        let ids = body["results"][0]["ids"]
            .as_array()
            .ok_or_else(|| SyncError::Parse("allocator response missing results[0].ids".into()))?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(String::from)
                    .ok_or_else(|| SyncError::Parse("allocator returned a non-string id".into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> StoreClient {
        StoreClient::new("test-key".into(), server.base_url())
    }

    #[test]
    fn find_returns_first_match() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v3/entity/orgunit")
                .header("x-apikey", "test-key")
                .query_param("filterfield", "externalid")
                .query_param("filtervalue", "E1")
                .query_param("take", "1")
                .query_param("includedisabled", "true");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"id": "n42", "externalid": "E1"}]));
        });

        let entity = client(&server)
            .find("externalid", "E1", "orgunit")
            .unwrap()
            .unwrap();

        mock.assert();
        assert_eq!(entity.id(), "n42");
    }

    #[test]
    fn find_empty_result_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v3/entity/orgunit");
            then.status(200).json_body(json!([]));
        });

        let found = client(&server).find("externalid", "E1", "orgunit").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn find_404_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v3/entity/orgunit");
            then.status(404);
        });

        let found = client(&server).find("externalid", "E1", "orgunit").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn find_server_error_carries_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v3/entity/orgunit");
            then.status(502).body("bad gateway");
        });

        let err = client(&server)
            .find("externalid", "E1", "orgunit")
            .unwrap_err();
        match err {
            SyncError::Lookup { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected Lookup error, got {other}"),
        }
    }

    #[test]
    fn write_puts_full_document() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/entity/orgunit/n42")
                .header("x-apikey", "test-key")
                .json_body(json!({"id": "n42", "externalid": "E1"}));
            then.status(200);
        });

        let entity: Entity =
            serde_json::from_value(json!({"id": "n42", "externalid": "E1"})).unwrap();
        client(&server).write("orgunit", "n42", &entity).unwrap();
        mock.assert();
    }

    #[test]
    fn write_non_200_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/entity/orgunit/n42");
            then.status(403).body("forbidden");
        });

        let entity: Entity = serde_json::from_value(json!({"id": "n42"})).unwrap();
        let err = client(&server).write("orgunit", "n42", &entity).unwrap_err();
        assert!(matches!(err, SyncError::Write { status: 403, .. }));
    }

    #[test]
    fn allocate_parses_id_batch_in_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/id").query_param("count", "20");
            then.status(200)
                .json_body(json!({"results": [{"ids": ["a", "b", "c"]}]}));
        });

        let ids = client(&server).allocate(20).unwrap();
        mock.assert();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn allocate_failure_is_allocation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/id");
            then.status(500).body("oops");
        });

        let err = client(&server).allocate(20).unwrap_err();
        assert!(matches!(err, SyncError::Allocation { status: 500, .. }));
    }

    #[test]
    fn allocate_malformed_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/id");
            then.status(200).json_body(json!({"results": []}));
        });

        let err = client(&server).allocate(20).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }
}
