//! Cognito user-pool identity provider.
//!
//! Talks to the user-pool JSON API directly:
//!
//! ```text
//! POST https://cognito-idp.{region}.amazonaws.com/
//! Content-Type: application/x-amz-json-1.1
//! X-Amz-Target: AWSCognitoIdentityProviderService.{Operation}
//! ```
//!
//! Error responses carry `__type` and `message`, which become
//! [`AuthError::Provider`]. Tokens are persisted through a [`SessionStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::{
    AuthUser, ChallengeKind, CodeDelivery, ContactAttribute, PendingChallenge, SignInOutcome,
};
use crate::config::AuthSettings;
use crate::error::AuthError;
use crate::session::{jwt_expiry, Session};
use crate::traits::{Headers, HttpClient, IdentityProvider, SessionStore};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Sessions expiring within this many seconds are refreshed before use.
pub const REFRESH_SKEW_SECS: i64 = 60;

/// Provider error code used when the user pool could not be reached.
pub const NETWORK_ERROR_CODE: &str = "NetworkError";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthResponse {
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    challenge_name: Option<String>,
    #[serde(default)]
    session: Option<String>,
    #[serde(default)]
    challenge_parameters: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CodeDeliveryDetails {
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    delivery_medium: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CodeDeliveryResponse {
    #[serde(default)]
    code_delivery_details: CodeDeliveryDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserAttribute {
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<UserAttribute>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

impl From<CodeDeliveryResponse> for CodeDelivery {
    fn from(response: CodeDeliveryResponse) -> Self {
        CodeDelivery {
            destination: response.code_delivery_details.destination,
            medium: response.code_delivery_details.delivery_medium,
        }
    }
}

/// [`IdentityProvider`] backed by a Cognito user pool.
pub struct CognitoIdentityProvider {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn SessionStore>,
    client_id: String,
    url: String,
}

impl CognitoIdentityProvider {
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn SessionStore>,
        settings: &AuthSettings,
    ) -> Self {
        Self {
            http,
            store,
            client_id: settings.user_pool_web_client_id.clone(),
            url: settings.identity_url(),
        }
    }

    /// Point the adapter at a different service URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, body: Value) -> Result<T, AuthError> {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE.to_string());
        headers.insert(
            "X-Amz-Target".to_string(),
            format!("{}.{}", TARGET_PREFIX, operation),
        );

        debug!(operation, "Calling user pool");
        let response = self
            .http
            .post(&self.url, &body.to_string(), &headers)
            .await
            .map_err(|e| {
                warn!(operation, error = %e, "User pool unreachable");
                AuthError::provider(NETWORK_ERROR_CODE, e.to_string())
            })?;

        if !response.is_success() {
            let err = provider_error(response.status, &response.body);
            warn!(operation, status = response.status, error = %err, "User pool rejected request");
            return Err(err);
        }

        let bytes: &[u8] = if response.body.is_empty() { b"{}" } else { &response.body };
        serde_json::from_slice(bytes).map_err(|e| {
            AuthError::provider("InvalidResponse", format!("{} returned: {}", operation, e))
        })
    }

    /// Turn an `InitiateAuth` / `RespondToAuthChallenge` reply into an outcome.
    async fn finish_auth(
        &self,
        username: &str,
        response: AuthResponse,
    ) -> Result<SignInOutcome, AuthError> {
        if let Some(result) = response.authentication_result {
            let session = session_from(result, None);
            self.store.save(&session).await.map_err(|e| {
                AuthError::provider("SessionStoreError", e.to_string())
            })?;
            info!(username, "Signed in");
            let user = self.get_user(&session.access_token).await?;
            return Ok(SignInOutcome::SignedIn(user));
        }

        let Some(name) = response.challenge_name else {
            return Err(AuthError::provider(
                "InvalidResponse",
                "Neither tokens nor a challenge were returned",
            ));
        };
        let kind = ChallengeKind::from_challenge_name(&name).ok_or_else(|| {
            AuthError::provider("UnsupportedChallenge", format!("Challenge {} is not supported", name))
        })?;
        let username = response
            .challenge_parameters
            .get("USER_ID_FOR_SRP")
            .cloned()
            .unwrap_or_else(|| username.to_string());
        info!(challenge = name.as_str(), "Sign-in requires a challenge");
        Ok(SignInOutcome::Challenge(PendingChallenge {
            kind,
            username,
            session: response.session.unwrap_or_default(),
            destination: response
                .challenge_parameters
                .get("CODE_DELIVERY_DESTINATION")
                .cloned(),
        }))
    }

    async fn answer_challenge(
        &self,
        challenge: &PendingChallenge,
        answer: &str,
    ) -> Result<SignInOutcome, AuthError> {
        let mut responses = serde_json::Map::new();
        responses.insert("USERNAME".to_string(), json!(challenge.username));
        responses.insert(challenge.kind.answer_key().to_string(), json!(answer));

        let response: AuthResponse = self
            .call(
                "RespondToAuthChallenge",
                json!({
                    "ChallengeName": challenge.kind.challenge_name(),
                    "ClientId": self.client_id,
                    "Session": challenge.session,
                    "ChallengeResponses": responses,
                }),
            )
            .await?;
        self.finish_auth(&challenge.username, response).await
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response: GetUserResponse = self
            .call("GetUser", json!({ "AccessToken": access_token }))
            .await?;
        Ok(AuthUser {
            username: response.username,
            attributes: response
                .user_attributes
                .into_iter()
                .map(|a| (a.name, a.value))
                .collect(),
        })
    }

    async fn refresh(&self, stale: Session) -> Result<Session, AuthError> {
        let Some(refresh_token) = stale.refresh_token.clone() else {
            debug!("Session expired and no refresh token is stored");
            self.forget().await;
            return Err(AuthError::NoActiveSession);
        };

        let response: Result<AuthResponse, AuthError> = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "REFRESH_TOKEN_AUTH",
                    "ClientId": self.client_id,
                    "AuthParameters": { "REFRESH_TOKEN": refresh_token },
                }),
            )
            .await;

        match response {
            Ok(AuthResponse {
                authentication_result: Some(result),
                ..
            }) => {
                let session = session_from(result, Some(refresh_token));
                if let Err(e) = self.store.save(&session).await {
                    warn!(error = %e, "Could not persist refreshed session");
                }
                info!(expires_at = session.expires_at, "Session refreshed");
                Ok(session)
            }
            Err(AuthError::Provider { code, message }) if code == NETWORK_ERROR_CODE => {
                Err(AuthError::Provider { code, message })
            }
            other => {
                if let Err(e) = &other {
                    info!(error = %e, "Session refresh rejected; signing out locally");
                }
                self.forget().await;
                Err(AuthError::NoActiveSession)
            }
        }
    }

    async fn forget(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Could not clear stored session");
        }
    }
}

impl std::fmt::Debug for CognitoIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoIdentityProvider")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_in(&self, username: &str, password: &str) -> Result<SignInOutcome, AuthError> {
        let response: AuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "USER_PASSWORD_AUTH",
                    "ClientId": self.client_id,
                    "AuthParameters": { "USERNAME": username, "PASSWORD": password },
                }),
            )
            .await?;
        self.finish_auth(username, response).await
    }

    async fn confirm_sign_in(
        &self,
        challenge: &PendingChallenge,
        code: &str,
    ) -> Result<SignInOutcome, AuthError> {
        self.answer_challenge(challenge, code).await
    }

    async fn complete_new_password(
        &self,
        challenge: &PendingChallenge,
        new_password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        self.answer_challenge(challenge, new_password).await
    }

    async fn forgot_password(&self, username: &str) -> Result<CodeDelivery, AuthError> {
        let response: CodeDeliveryResponse = self
            .call(
                "ForgotPassword",
                json!({ "ClientId": self.client_id, "Username": username }),
            )
            .await?;
        Ok(response.into())
    }

    async fn forgot_password_submit(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let _: Value = self
            .call(
                "ConfirmForgotPassword",
                json!({
                    "ClientId": self.client_id,
                    "Username": username,
                    "ConfirmationCode": code,
                    "Password": new_password,
                }),
            )
            .await?;
        Ok(())
    }

    async fn verify_contact(&self, attribute: ContactAttribute) -> Result<CodeDelivery, AuthError> {
        let session = self.current_session().await?;
        let response: CodeDeliveryResponse = self
            .call(
                "GetUserAttributeVerificationCode",
                json!({
                    "AccessToken": session.access_token,
                    "AttributeName": attribute.attribute_name(),
                }),
            )
            .await?;
        Ok(response.into())
    }

    async fn verify_contact_submit(
        &self,
        attribute: ContactAttribute,
        code: &str,
    ) -> Result<(), AuthError> {
        let session = self.current_session().await?;
        let _: Value = self
            .call(
                "VerifyUserAttribute",
                json!({
                    "AccessToken": session.access_token,
                    "AttributeName": attribute.attribute_name(),
                    "Code": code,
                }),
            )
            .await?;
        Ok(())
    }

    async fn current_session(&self) -> Result<Session, AuthError> {
        let stored = self.store.load().await.map_err(|e| {
            warn!(error = %e, "Could not read stored session");
            AuthError::NoActiveSession
        })?;
        let Some(session) = stored else {
            return Err(AuthError::NoActiveSession);
        };

        let now = chrono::Utc::now().timestamp();
        if session.expires_within(REFRESH_SKEW_SECS, now) {
            return self.refresh(session).await;
        }
        Ok(session)
    }

    async fn current_user(&self) -> Result<AuthUser, AuthError> {
        let session = self.current_session().await?;
        self.get_user(&session.access_token).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store
            .clear()
            .await
            .map_err(|e| AuthError::provider("SessionStoreError", e.to_string()))?;
        info!("Signed out");
        Ok(())
    }
}

fn session_from(result: AuthenticationResult, previous_refresh: Option<String>) -> Session {
    let now = chrono::Utc::now().timestamp();
    let expires_at = result
        .expires_in
        .map(|secs| now + secs)
        .or_else(|| jwt_expiry(&result.id_token))
        .unwrap_or(now + 3600);
    Session {
        id_token: result.id_token,
        access_token: result.access_token,
        refresh_token: result.refresh_token.or(previous_refresh),
        expires_at,
    }
}

fn provider_error(status: u16, body: &[u8]) -> AuthError {
    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
    let (kind, message) = match parsed {
        Some(ErrorBody { kind, message }) => (kind, message),
        None => (None, None),
    };
    let code = kind
        .map(|k| k.rsplit('#').next().unwrap_or(&k).to_string())
        .unwrap_or_else(|| format!("HTTP{}", status));
    AuthError::Provider {
        code,
        message: message.unwrap_or_default(),
    }
}
