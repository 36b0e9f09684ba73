//! Token requests

use gsb_auth::AuthSession;
use gsb_core::{GsbError, GsbResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::GsbClient;

pub const GET_TOKEN_PATH: &str = "/api/auth/getToken";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    user_name: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_code: Option<String>,
}

/// The server answers with `{ "token": ... }` or a bare string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenReply {
    Wrapped { token: String },
    Bare(String),
}

impl TokenReply {
    fn into_token(self) -> String {
        match self {
            Self::Wrapped { token } | Self::Bare(token) => token,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    client: GsbClient,
}

impl AuthService {
    pub fn new(client: GsbClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for an access token
    #[instrument(skip(self, password))]
    pub async fn get_token(&self, user_name: &str, password: &str) -> GsbResult<String> {
        let body = serde_json::to_value(TokenRequest {
            user_name,
            password,
            tenant_code: self.client.tenant_code(None),
        })?;

        let reply = self.client.post_anonymous(GET_TOKEN_PATH, body).await?;
        let token = serde_json::from_value::<TokenReply>(reply)
            .map(TokenReply::into_token)
            .map_err(|_| GsbError::Unauthorized {
                message: "Token response did not contain a token".to_string(),
            })?;

        if token.trim().is_empty() {
            return Err(GsbError::Unauthorized {
                message: "Server returned an empty token".to_string(),
            });
        }

        debug!("Obtained access token");
        Ok(token)
    }

    /// Fetch a token with the configured credentials and keep it
    pub async fn login(&self) -> GsbResult<AuthSession> {
        let auth = &self.client.config().auth;
        let (Some(user_name), Some(password)) = (auth.user_name.as_deref(), auth.password.as_deref())
        else {
            return Err(GsbError::Unauthorized {
                message: "No credentials configured".to_string(),
            });
        };

        let token = self.get_token(user_name, password).await?;
        Ok(self.client.tokens().set(&token)?)
    }
}
