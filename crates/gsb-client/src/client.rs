//! GSB API client
//!
//! [`GsbClient`] owns the configuration, the transport, the token session and
//! the metadata caches. It is cheap to clone; clones share all of them.
//! Services are thin views over a client.

use std::sync::Arc;

use gsb_auth::{resolve_tenant_code, AuthSession, TokenStore};
use gsb_core::config::ClientConfig;
use gsb_core::{GsbError, GsbResult};
use gsb_models::{GsbEntityDef, GsbEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::cache::GsbCacheService;
use crate::name_check::NameChecker;
use crate::services::{AuthService, EntityDefService, EntityService, WorkflowService};
use crate::transport::{ApiRequest, ApiTransport, HttpTransport};

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn ApiTransport>,
    tokens: TokenStore,
    login_lock: Mutex<()>,
    entity_defs: GsbCacheService<GsbEntityDef>,
    enums: GsbCacheService<GsbEnum>,
}

/// Shared handle to a GSB server
#[derive(Clone)]
pub struct GsbClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for GsbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GsbClient")
            .field("base_url", &self.inner.config.api.base_url)
            .field("tenant_code", &self.inner.config.api.tenant_code)
            .finish()
    }
}

impl GsbClient {
    /// Client talking HTTP to the configured server
    pub fn new(config: ClientConfig) -> GsbResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Client over any transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn ApiTransport>) -> GsbResult<Self> {
        let tokens = match config.auth.token.as_deref() {
            Some(token) => TokenStore::with_token(token)?,
            None => TokenStore::new(),
        };

        let ttl = config.cache_ttl();
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                tokens,
                login_lock: Mutex::new(()),
                entity_defs: GsbCacheService::new(ttl),
                enums: GsbCacheService::new(ttl),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // Services

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn entities(&self) -> EntityService {
        EntityService::new(self.clone())
    }

    pub fn entity_defs(&self) -> EntityDefService {
        EntityDefService::new(self.clone())
    }

    pub fn workflows(&self) -> WorkflowService {
        WorkflowService::new(self.clone())
    }

    /// Debounced uniqueness checks for new entity definition names
    pub fn name_checker(&self) -> NameChecker {
        NameChecker::new(self.entity_defs(), self.config().name_check_debounce())
    }

    pub(crate) fn entity_def_cache(&self) -> &GsbCacheService<GsbEntityDef> {
        &self.inner.entity_defs
    }

    pub(crate) fn enum_cache(&self) -> &GsbCacheService<GsbEnum> {
        &self.inner.enums
    }

    pub(crate) fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    // Session

    /// The current session, fetching a token with the configured credentials if needed
    pub async fn session(&self) -> GsbResult<AuthSession> {
        if let Some(session) = self.inner.tokens.current() {
            return Ok(session);
        }

        let _guard = self.inner.login_lock.lock().await;
        // Another task may have logged in while we waited
        if let Some(session) = self.inner.tokens.current() {
            return Ok(session);
        }

        if !self.inner.config.has_credentials() {
            return Err(GsbError::Unauthorized {
                message: "No valid token and no credentials configured".to_string(),
            });
        }

        self.auth().login().await
    }

    /// Forget the current token
    pub fn logout(&self) {
        if self.inner.tokens.clear() {
            debug!("Cleared access token");
        }
    }

    /// Tenant code for requests made with the given session
    pub fn tenant_code(&self, session: Option<&AuthSession>) -> Option<String> {
        resolve_tenant_code(
            self.inner.config.api.tenant_code.as_deref(),
            session.map(|s| &s.claims),
        )
    }

    // Requests

    /// Authenticated post of a JSON body
    #[instrument(skip(self, body))]
    pub async fn post_value(&self, path: &str, body: Value) -> GsbResult<Value> {
        let session = self.session().await?;
        let request = ApiRequest::new(path, body)
            .with_token(session.token.as_str())
            .with_tenant_code(self.tenant_code(Some(&session)));

        let result = self.inner.transport.post(request).await;
        if let Err(e) = &result {
            if e.is_auth_failure() {
                if self.inner.tokens.clear_token(&session.token) {
                    warn!(error = %e, "Token rejected, dropping it");
                }
            }
        }
        result
    }

    /// Authenticated post with typed request and response
    pub async fn post<B, R>(&self, path: &str, body: &B) -> GsbResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let value = self.post_value(path, serde_json::to_value(body)?).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Post without a token, for the token request
    pub(crate) async fn post_anonymous(&self, path: &str, body: Value) -> GsbResult<Value> {
        let request = ApiRequest::new(path, body).with_tenant_code(self.tenant_code(None));
        self.inner.transport.post(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config, make_token, with_credentials};
    use crate::transport::MockApiTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_preissued_token_is_used() {
        let token = make_token(Some("ACME"));
        let mut cfg = config();
        cfg.auth.token = Some(token.clone());

        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(move |req| {
                req.path == "/api/entity/get"
                    && req.token.as_deref() == Some(token.as_str())
                    && req.tenant_code.as_deref() == Some("ACME")
            })
            .times(1)
            .returning(|_| Ok(json!({ "id": "o-1" })));

        let client = GsbClient::with_transport(cfg, Arc::new(transport)).unwrap();
        let value = client.post_value("/api/entity/get", json!({})).await.unwrap();
        assert_eq!(value, json!({ "id": "o-1" }));
    }

    #[tokio::test]
    async fn test_token_fetched_lazily_once() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == "/api/auth/getToken")
            .times(1)
            .returning(|_| Ok(json!({ "token": make_token(Some("ACME")) })));
        transport
            .expect_post()
            .withf(|req| req.path == "/api/entity/query" && req.token.is_some())
            .times(2)
            .returning(|_| Ok(json!({ "entities": [] })));

        let client = GsbClient::with_transport(with_credentials(config()), Arc::new(transport)).unwrap();
        client.post_value("/api/entity/query", json!({})).await.unwrap();
        client.post_value("/api/entity/query", json!({})).await.unwrap();
    }

    #[tokio::test]
    async fn test_configured_tenant_overrides_claim() {
        let mut cfg = config();
        cfg.api.tenant_code = Some("CONFIGURED".into());
        cfg.auth.token = Some(make_token(Some("FROM_TOKEN")));

        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.tenant_code.as_deref() == Some("CONFIGURED"))
            .returning(|_| Ok(Value::Null));

        let client = GsbClient::with_transport(cfg, Arc::new(transport)).unwrap();
        client.post_value("/api/entity/delete", json!({})).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_credentials_is_unauthorized() {
        let transport = MockApiTransport::new();
        let client = GsbClient::with_transport(config(), Arc::new(transport)).unwrap();

        let err = client.post_value("/api/entity/query", json!({})).await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_rejected_token_is_dropped() {
        let mut cfg = config();
        cfg.auth.token = Some(make_token(None));

        let mut transport = MockApiTransport::new();
        transport.expect_post().times(1).returning(|_| {
            Err(GsbError::from_status(401, "token revoked"))
        });

        let client = GsbClient::with_transport(cfg, Arc::new(transport)).unwrap();
        let err = client.post_value("/api/entity/query", json!({})).await.unwrap_err();
        assert!(err.is_auth_failure());
        assert!(client.tokens().current().is_none());
    }

    #[tokio::test]
    async fn test_rejection_keeps_token_refreshed_meanwhile() {
        let mut cfg = config();
        cfg.auth.token = Some(make_token(Some("OLD")));
        let refreshed = make_token(Some("NEW"));

        let handle: Arc<std::sync::Mutex<Option<GsbClient>>> = Arc::default();
        let in_flight = handle.clone();
        let newer = refreshed.clone();
        let mut transport = MockApiTransport::new();
        transport.expect_post().times(1).returning(move |_| {
            if let Some(client) = in_flight.lock().unwrap().as_ref() {
                client.tokens().set(&newer).unwrap();
            }
            Err(GsbError::from_status(401, "token revoked"))
        });

        let client = GsbClient::with_transport(cfg, Arc::new(transport)).unwrap();
        *handle.lock().unwrap() = Some(client.clone());

        let err = client.post_value("/api/entity/query", json!({})).await.unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(client.tokens().current().unwrap().token, refreshed);
    }

    #[tokio::test]
    async fn test_api_error_is_not_retried() {
        let mut cfg = config();
        cfg.auth.token = Some(make_token(None));

        let mut transport = MockApiTransport::new();
        transport.expect_post().times(1).returning(|_| {
            Err(GsbError::Api {
                status: 500,
                message: "boom".into(),
            })
        });

        let client = GsbClient::with_transport(cfg, Arc::new(transport)).unwrap();
        let err = client.post_value("/api/entity/query", json!({})).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(client.tokens().current().is_some());
    }
}
