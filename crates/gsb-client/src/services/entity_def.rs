//! Entity definitions and enums
//!
//! Both are cached per client for the configured TTL. Saving a definition
//! elsewhere does not refresh the cache.

use async_trait::async_trait;
use gsb_core::{GsbError, GsbResult};
use gsb_grid::DefinitionLookup;
use gsb_models::entity_def::ENTITY_DEF_ENTITY;
use gsb_models::enums::ENUM_ENTITY;
use gsb_models::{validate_name, GsbEntityDef, GsbEnum};
use gsb_queries::presets;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::GsbClient;
use crate::services::EntityService;

pub const GET_PATH: &str = "/api/entityDef/get";

#[derive(Debug, Serialize)]
struct DefinitionRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Clone)]
pub struct EntityDefService {
    client: GsbClient,
}

impl EntityDefService {
    pub fn new(client: GsbClient) -> Self {
        Self { client }
    }

    /// Entity definition by name, served from cache when fresh
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> GsbResult<GsbEntityDef> {
        self.client
            .entity_def_cache()
            .get_or_try_load(name, || self.fetch(name))
            .await
    }

    async fn fetch(&self, name: &str) -> GsbResult<GsbEntityDef> {
        let value = self
            .client
            .post_value(GET_PATH, serde_json::to_value(DefinitionRequest { name })?)
            .await?;

        match value {
            Value::Null => Err(GsbError::not_found(ENTITY_DEF_ENTITY, "name", name)),
            value => {
                let def: GsbEntityDef = serde_json::from_value(value)?;
                debug!(properties = def.properties.len(), "Loaded entity definition");
                Ok(def)
            }
        }
    }

    /// Enum with its values, loaded through the entity query and cached
    #[instrument(skip(self))]
    pub async fn get_enum(&self, name: &str) -> GsbResult<GsbEnum> {
        self.client
            .enum_cache()
            .get_or_try_load(name, || async {
                let result = self.entities().query_as::<GsbEnum>(&presets::enum_by_name(name)).await?;
                result
                    .entities
                    .into_iter()
                    .next()
                    .ok_or_else(|| GsbError::not_found(ENUM_ENTITY, "name", name))
            })
            .await
    }

    /// Whether no entity definition uses the name yet
    ///
    /// Names breaking the naming rules fail with `InvalidName` before any
    /// request is made.
    #[instrument(skip(self))]
    pub async fn is_name_available(&self, name: &str) -> GsbResult<bool> {
        validate_name(name)?;
        let result = self.entities().query(&presets::entity_def_by_name(name)).await?;
        Ok(result.is_empty())
    }

    /// Drop a cached definition
    pub fn invalidate(&self, name: &str) -> bool {
        self.client.entity_def_cache().invalidate(name)
    }

    /// Drop every cached definition and enum
    pub fn clear_cache(&self) {
        self.client.entity_def_cache().clear();
        self.client.enum_cache().clear();
    }

    fn entities(&self) -> EntityService {
        self.client.entities()
    }
}

#[async_trait]
impl DefinitionLookup for EntityDefService {
    async fn entity_def(&self, name: &str) -> GsbResult<GsbEntityDef> {
        self.get(name).await
    }

    async fn enumeration(&self, name: &str) -> GsbResult<GsbEnum> {
        self.get_enum(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::entity::QUERY_PATH;
    use crate::test_support::client_with;
    use crate::transport::MockApiTransport;
    use gsb_grid::{build_columns, CellRenderer};
    use serde_json::json;

    fn order_def_json() -> Value {
        json!({
            "id": "ed-1",
            "name": "Order",
            "properties": [
                { "name": "number", "propDef": { "name": "string", "dataType": "string" } },
                {
                    "name": "status",
                    "propDef": { "name": "enum", "dataType": "enum" },
                    "enumName": "OrderStatus"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_get_is_cached() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == GET_PATH && req.body == json!({ "name": "Order" }))
            .times(1)
            .returning(|_| Ok(order_def_json()));

        let service = client_with(transport).entity_defs();
        let first = service.get("Order").await.unwrap();
        let second = service.get("Order").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.properties.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .times(2)
            .returning(|_| Ok(order_def_json()));

        let service = client_with(transport).entity_defs();
        service.get("Order").await.unwrap();
        assert!(service.invalidate("Order"));
        service.get("Order").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_definition() {
        let mut transport = MockApiTransport::new();
        transport.expect_post().returning(|_| Ok(Value::Null));

        let err = client_with(transport).entity_defs().get("Nope").await.unwrap_err();
        assert!(matches!(err, GsbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_enum() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == QUERY_PATH && req.body["entDefName"] == json!("GsbEnum"))
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "entities": [{
                        "name": "OrderStatus",
                        "values": [{ "value": 1, "name": "open" }, { "value": 2, "name": "paid" }]
                    }]
                }))
            });

        let service = client_with(transport).entity_defs();
        let gsb_enum = service.get_enum("OrderStatus").await.unwrap();
        assert_eq!(gsb_enum.values.len(), 2);
        // Second read is served from cache
        service.get_enum("OrderStatus").await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_name_makes_no_request() {
        let transport = MockApiTransport::new();
        let err = client_with(transport)
            .entity_defs()
            .is_name_available("9 lives")
            .await
            .unwrap_err();
        assert!(matches!(err, GsbError::InvalidName { .. }));
    }

    #[tokio::test]
    async fn test_is_name_available() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.body["query"][0]["value"] == json!("Order"))
            .returning(|_| Ok(json!({ "entities": [{ "id": "ed-1", "name": "Order" }] })));
        transport
            .expect_post()
            .withf(|req| req.body["query"][0]["value"] == json!("Invoice"))
            .returning(|_| Ok(json!({ "entities": [] })));

        let service = client_with(transport).entity_defs();
        assert!(!service.is_name_available("Order").await.unwrap());
        assert!(service.is_name_available("Invoice").await.unwrap());
    }

    #[tokio::test]
    async fn test_columns_with_failed_enum_fall_back() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == GET_PATH)
            .returning(|_| Ok(order_def_json()));
        transport
            .expect_post()
            .withf(|req| req.path == QUERY_PATH)
            .returning(|_| Err(GsbError::Api { status: 500, message: "down".into() }));

        let service = client_with(transport).entity_defs();
        let def = service.get("Order").await.unwrap();
        let columns = build_columns(&def, &service).await;

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].kind.renderer, CellRenderer::Raw);
    }
}
