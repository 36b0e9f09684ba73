//! Entity records

use gsb_core::{GsbError, GsbResult, ValidationErrors};
use gsb_models::{GsbEntity, QueryResult};
use gsb_queries::QueryParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::GsbClient;

pub const GET_PATH: &str = "/api/entity/get";
pub const QUERY_PATH: &str = "/api/entity/query";
pub const SAVE_PATH: &str = "/api/entity/save";
pub const DELETE_PATH: &str = "/api/entity/delete";
pub const QUERY_MAPPED_PATH: &str = "/api/entity/queryMapped";
pub const SAVE_MAPPED_ITEMS_PATH: &str = "/api/entity/saveMappedItems";
pub const REMOVE_MAPPED_ITEMS_PATH: &str = "/api/entity/removeMappedItems";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntityKey<'a> {
    ent_def_name: &'a str,
    id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest<'a> {
    ent_def_name: &'a str,
    entity: &'a GsbEntity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MappedQueryRequest<'a> {
    ent_def_name: &'a str,
    entity_id: &'a str,
    prop_name: &'a str,
    query: &'a QueryParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MappedItemsRequest<'a> {
    ent_def_name: &'a str,
    entity_id: &'a str,
    prop_name: &'a str,
    mapped_item_ids: &'a [String],
}

/// Generic CRUD over entity records
#[derive(Debug, Clone)]
pub struct EntityService {
    client: GsbClient,
}

impl EntityService {
    pub fn new(client: GsbClient) -> Self {
        Self { client }
    }

    /// Load one record
    #[instrument(skip(self))]
    pub async fn get(&self, ent_def_name: &str, id: &str) -> GsbResult<GsbEntity> {
        let value = self
            .client
            .post_value(GET_PATH, serde_json::to_value(EntityKey { ent_def_name, id })?)
            .await?;

        match value {
            Value::Null => Err(GsbError::not_found(ent_def_name, "id", id)),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    /// Run a query
    #[instrument(skip(self, query), fields(target = query.target()))]
    pub async fn query(&self, query: &QueryParams) -> GsbResult<QueryResult> {
        require_target(query)?;
        let value = self.client.post_value(QUERY_PATH, serde_json::to_value(query)?).await?;
        let result = parse_result(value)?;
        debug!(rows = result.len(), total = ?result.total_count, "Query returned");
        Ok(result)
    }

    /// Run a query and decode every record into `T`
    pub async fn query_as<T: DeserializeOwned>(&self, query: &QueryParams) -> GsbResult<QueryResult<T>> {
        let result = self.query(query).await?;
        let entities = result
            .entities
            .iter()
            .map(|e| e.to_model::<T>())
            .collect::<Result<Vec<T>, _>>()?;
        Ok(QueryResult {
            entities,
            total_count: result.total_count,
        })
    }

    /// Create or update a record; returns the record as stored
    #[instrument(skip(self, entity), fields(id = ?entity.as_map().get("id")))]
    pub async fn save(&self, ent_def_name: &str, entity: &GsbEntity) -> GsbResult<GsbEntity> {
        let value = self
            .client
            .post_value(SAVE_PATH, serde_json::to_value(SaveRequest { ent_def_name, entity })?)
            .await?;

        match value {
            // Some deployments answer with an empty body
            Value::Null => Ok(entity.clone()),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, ent_def_name: &str, id: &str) -> GsbResult<()> {
        self.client
            .post_value(DELETE_PATH, serde_json::to_value(EntityKey { ent_def_name, id })?)
            .await?;
        Ok(())
    }

    /// Query the records mapped to an entity through a many-to-many property
    #[instrument(skip(self, query))]
    pub async fn query_mapped(
        &self,
        ent_def_name: &str,
        entity_id: &str,
        prop_name: &str,
        query: &QueryParams,
    ) -> GsbResult<QueryResult> {
        let body = MappedQueryRequest {
            ent_def_name,
            entity_id,
            prop_name,
            query,
        };
        let value = self
            .client
            .post_value(QUERY_MAPPED_PATH, serde_json::to_value(body)?)
            .await?;
        parse_result(value)
    }

    /// Add mappings from an entity to other records
    #[instrument(skip(self, item_ids), fields(items = item_ids.len()))]
    pub async fn save_mapped_items(
        &self,
        ent_def_name: &str,
        entity_id: &str,
        prop_name: &str,
        item_ids: &[String],
    ) -> GsbResult<()> {
        self.post_mapped_items(SAVE_MAPPED_ITEMS_PATH, ent_def_name, entity_id, prop_name, item_ids)
            .await
    }

    /// Remove mappings from an entity to other records
    #[instrument(skip(self, item_ids), fields(items = item_ids.len()))]
    pub async fn remove_mapped_items(
        &self,
        ent_def_name: &str,
        entity_id: &str,
        prop_name: &str,
        item_ids: &[String],
    ) -> GsbResult<()> {
        self.post_mapped_items(REMOVE_MAPPED_ITEMS_PATH, ent_def_name, entity_id, prop_name, item_ids)
            .await
    }

    async fn post_mapped_items(
        &self,
        path: &str,
        ent_def_name: &str,
        entity_id: &str,
        prop_name: &str,
        item_ids: &[String],
    ) -> GsbResult<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let body = MappedItemsRequest {
            ent_def_name,
            entity_id,
            prop_name,
            mapped_item_ids: item_ids,
        };
        self.client.post_value(path, serde_json::to_value(body)?).await?;
        Ok(())
    }
}

fn require_target(query: &QueryParams) -> GsbResult<()> {
    if query.ent_def_name.is_none() && query.ent_def_id.is_none() {
        let mut errors = ValidationErrors::new();
        errors.add("entDefName", "can't be blank");
        return errors.into_result();
    }
    Ok(())
}

fn parse_result(value: Value) -> GsbResult<QueryResult> {
    match value {
        Value::Null => Ok(QueryResult::default()),
        // A bare array carries no total
        Value::Array(rows) => Ok(QueryResult {
            entities: serde_json::from_value(Value::Array(rows))?,
            total_count: None,
        }),
        value => Ok(serde_json::from_value(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with;
    use crate::transport::MockApiTransport;
    use gsb_queries::SingleQuery;
    use serde::Deserialize;
    use serde_json::json;

    #[tokio::test]
    async fn test_get() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == GET_PATH && req.body == json!({ "entDefName": "Order", "id": "o-1" }))
            .returning(|_| Ok(json!({ "id": "o-1", "number": "A-1" })));

        let entity = client_with(transport).entities().get("Order", "o-1").await.unwrap();
        assert_eq!(entity.get_str("number"), Some("A-1"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut transport = MockApiTransport::new();
        transport.expect_post().returning(|_| Ok(Value::Null));

        let err = client_with(transport).entities().get("Order", "nope").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_query_posts_params() {
        let mut query = QueryParams::new("Order");
        query.where_query(SingleQuery::equals("status", "open").named("status"));
        let expected = serde_json::to_value(&query).unwrap();

        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(move |req| req.path == QUERY_PATH && req.body == expected)
            .returning(|_| {
                Ok(json!({ "entities": [{ "id": "o-1" }, { "id": "o-2" }], "totalCount": 10 }))
            });

        let result = client_with(transport).entities().query(&query).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.total(), 10);
    }

    #[tokio::test]
    async fn test_query_without_target_is_rejected_locally() {
        let transport = MockApiTransport::new();
        let err = client_with(transport)
            .entities()
            .query(&QueryParams::sub())
            .await
            .unwrap_err();
        assert!(matches!(err, GsbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_query_as() {
        #[derive(Debug, Deserialize)]
        struct Order {
            id: String,
            amount: f64,
        }

        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .returning(|_| Ok(json!([{ "id": "o-1", "amount": 12.5 }])));

        let result = client_with(transport)
            .entities()
            .query_as::<Order>(&QueryParams::new("Order"))
            .await
            .unwrap();
        assert_eq!(result.entities[0].id, "o-1");
        assert_eq!(result.entities[0].amount, 12.5);
        assert_eq!(result.total_count, None);
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == SAVE_PATH && req.body["entity"]["number"] == json!("A-2"))
            .returning(|req| {
                let mut saved = req.body["entity"].clone();
                saved["id"] = json!("o-9");
                Ok(saved)
            });
        transport
            .expect_post()
            .withf(|req| req.path == DELETE_PATH && req.body["id"] == json!("o-9"))
            .times(1)
            .returning(|_| Ok(Value::Null));

        let service = client_with(transport).entities();
        let mut entity = GsbEntity::new();
        entity.set("number", "A-2");

        let saved = service.save("Order", &entity).await.unwrap();
        assert_eq!(saved.get_str("id"), Some("o-9"));
        service.delete("Order", "o-9").await.unwrap();
    }

    #[tokio::test]
    async fn test_mapped_items() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| {
                req.path == SAVE_MAPPED_ITEMS_PATH
                    && req.body
                        == json!({
                            "entDefName": "Order",
                            "entityId": "o-1",
                            "propName": "tags",
                            "mappedItemIds": ["t-1", "t-2"]
                        })
            })
            .times(1)
            .returning(|_| Ok(Value::Null));
        transport
            .expect_post()
            .withf(|req| req.path == QUERY_MAPPED_PATH && req.body["query"]["entDefName"] == json!("Tag"))
            .returning(|_| Ok(json!({ "entities": [{ "id": "t-1" }] })));

        let service = client_with(transport).entities();
        service
            .save_mapped_items("Order", "o-1", "tags", &["t-1".to_string(), "t-2".to_string()])
            .await
            .unwrap();
        // Nothing to remove, nothing sent
        service.remove_mapped_items("Order", "o-1", "tags", &[]).await.unwrap();

        let mapped = service
            .query_mapped("Order", "o-1", "tags", &QueryParams::new("Tag"))
            .await
            .unwrap();
        assert_eq!(mapped.len(), 1);
    }
}
