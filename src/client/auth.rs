/**
 * Authentication Module
 *
 * Login, logout and session restore. Login always talks to the server
 * directly; it is never queued, so it fails while offline. The credential is
 * held in the client context and persisted in the local database so a restart
 * keeps the user signed in. A restored token is checked against the server when
 * it is reachable and dropped if the server no longer accepts it.
 */

use crate::client::api_client::ApiClient;
use crate::client::context::ClientContext;
use crate::client::error::{ClientError, GatewayError, StorageError};
use crate::client::local_db::LocalDatabase;
use crate::client::types::{ApiMethod, AuthResponse, Credential, LoginRequest};
use crate::shared::SharedError;
use std::sync::Arc;

const TOKEN_KEY: &str = "access_token";
const USER_KEY: &str = "user_id";

#[derive(Debug, Clone)]
pub struct AuthService {
    context: ClientContext,
    api: ApiClient,
    db: Arc<LocalDatabase>,
}

impl AuthService {
    pub fn new(context: ClientContext, api: ApiClient, db: Arc<LocalDatabase>) -> Self {
        Self { context, api, db }
    }

    /// Login user with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, ClientError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(
                SharedError::validation("credentials", "Please enter username and password").into(),
            );
        }
        if !self.context.is_online() {
            let reason = "login requires a connection".to_string();
            return Err(GatewayError::RemoteUnreachable(reason).into());
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_string(&request).map_err(StorageError::from)?;

        let response = self
            .api
            .send(ApiMethod::Post, "/auth/login", Some(body), None)
            .await?;
        let auth: AuthResponse = serde_json::from_value(response)
            .map_err(|e| GatewayError::InvalidResponse(format!("login: {}", e)))?;
        let credential = Credential::from(auth);

        self.db
            .set_sync_metadata(TOKEN_KEY, &credential.access_token)
            .await
            .map_err(StorageError::from)?;
        self.db
            .set_sync_metadata(USER_KEY, &credential.user_id)
            .await
            .map_err(StorageError::from)?;
        self.context.set_credential(credential.clone()).await;

        tracing::info!("Logged in as user {}", credential.user_id);
        Ok(credential)
    }

    /// Forget the credential; queued operations and the mirror stay on disk
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.context.clear_credential().await;
        self.db.delete_sync_metadata(TOKEN_KEY).await.map_err(StorageError::from)?;
        self.db.delete_sync_metadata(USER_KEY).await.map_err(StorageError::from)?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Load a persisted credential into the context
    ///
    /// While online the token is checked with `GET /templates`. A 401 drops the
    /// session; any other failure keeps it, since the server may just be down.
    pub async fn restore(&self) -> Result<Option<Credential>, ClientError> {
        let token = self.db.get_sync_metadata(TOKEN_KEY).await.map_err(StorageError::from)?;
        let user = self.db.get_sync_metadata(USER_KEY).await.map_err(StorageError::from)?;

        let (Some(access_token), Some(user_id)) = (token, user) else {
            return Ok(None);
        };
        let credential = Credential {
            access_token,
            user_id,
        };

        if self.context.is_online() {
            match self.verify(&credential).await {
                Ok(()) => {}
                Err(GatewayError::Unauthorized { message }) => {
                    tracing::warn!(
                        "Saved session of user {} was rejected: {}",
                        credential.user_id,
                        message
                    );
                    self.logout().await?;
                    return Ok(None);
                }
                Err(e) => tracing::warn!("Could not verify saved session: {}", e),
            }
        }

        self.context.set_credential(credential.clone()).await;
        tracing::debug!("Restored session of user {}", credential.user_id);
        Ok(Some(credential))
    }

    async fn verify(&self, credential: &Credential) -> Result<(), GatewayError> {
        self.api
            .send(
                ApiMethod::Get,
                "/templates",
                None,
                Some(&credential.access_token),
            )
            .await?;
        Ok(())
    }
}
