use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use super::traits::RemoteGateway;
use crate::errors::CoreError;
use crate::models::session::{Session, SessionEvent};
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;
use crate::storage::prefs::{PrefsStore, StoredTokens};

/// Supabase-backed gateway: GoTrue for auth, PostgREST for the
/// `strategies` and `trades` tables.
///
/// - Auth endpoints: `/auth/v1/token?grant_type=password`,
///   `/auth/v1/token?grant_type=refresh_token`, `/auth/v1/user`,
///   `/auth/v1/logout`.
/// - Table endpoints: `/rest/v1/strategies`, `/rest/v1/trades` with
///   `Prefer: return=representation` on writes.
///
/// Session tokens are written to the prefs store on every change and
/// restored by [`Self::with_prefs`], so a fresh process resumes the
/// previous session through `/auth/v1/user` (refreshing an expired
/// access token along the way) instead of always starting signed out.
///
/// PostgREST rejections carry a JSON body `{code, message, ...}`; the codes
/// `42P01` / `42703` are what the schema classifier keys on when the tables
/// have not been provisioned yet.
pub struct SupabaseGateway {
    client: Client,
    base_url: String,
    /// Project anon key; sent as `apikey` and as the bearer fallback.
    anon_key: String,
    /// Tokens of the signed-in user, when there is one.
    tokens: Mutex<Option<StoredTokens>>,
    /// Durable mirror of `tokens`; absent for throwaway instances.
    prefs: Option<Arc<dyn PrefsStore>>,
    /// Live auth-state subscribers. Closed receivers are pruned on emit.
    subscribers: Mutex<Vec<UnboundedSender<SessionEvent>>>,
}

impl SupabaseGateway {
    /// Gateway without token persistence; every process starts signed out.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self::build(base_url, anon_key, None, None)
    }

    /// Gateway that restores the persisted session tokens from `prefs`
    /// and mirrors every token change back into it.
    pub fn with_prefs(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        prefs: Arc<dyn PrefsStore>,
    ) -> Self {
        let restored = prefs.session_tokens();
        Self::build(base_url, anon_key, restored, Some(prefs))
    }

    fn build(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        tokens: Option<StoredTokens>,
        prefs: Option<Arc<dyn PrefsStore>>,
    ) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            tokens: Mutex::new(tokens),
            prefs,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn current_tokens(&self) -> Option<StoredTokens> {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn bearer(&self) -> String {
        self.current_tokens()
            .map(|t| t.access_token)
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    fn store_tokens(&self, value: Option<StoredTokens>) {
        {
            let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
            *tokens = value.clone();
        }
        if let Some(prefs) = &self.prefs {
            if let Err(error) = prefs.set_session_tokens(value) {
                warn!(%error, "failed to persist session tokens");
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// The stored access token was rejected; trade the refresh token for
    /// a new pair. A rejected refresh token means the stored session is
    /// gone for good and resolves to signed-out; a transport failure
    /// propagates so startup can report the connection problem.
    async fn refresh_session(&self, tokens: StoredTokens) -> Result<Option<Session>, CoreError> {
        let Some(refresh_token) = tokens.refresh_token else {
            self.store_tokens(None);
            return Ok(None);
        };

        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if !resp.status().is_success() {
            debug!("refresh token rejected; clearing stored session");
            self.store_tokens(None);
            return Ok(None);
        }

        let token: TokenResponse = resp.json().await?;
        self.store_tokens(Some(StoredTokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        }));
        let session: Session = token.user.into();
        debug!(user = %session.user_id, "session refreshed");
        self.emit(SessionEvent::Refreshed(session.clone()));
        Ok(Some(session))
    }

    /// Decode a non-success PostgREST/GoTrue response into a structured
    /// gateway error, keeping the backend's code when one is present.
    async fn decode_error(resp: Response) -> CoreError {
        let status = resp.status();
        match resp.json::<ErrorBody>().await {
            Ok(body) => {
                let message = body
                    .message
                    .or(body.msg)
                    .or(body.error_description)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                warn!(%status, code = body.code.as_deref(), "gateway rejected request");
                CoreError::Gateway {
                    code: body.code,
                    message,
                }
            }
            Err(_) => CoreError::Gateway {
                code: None,
                message: format!("HTTP {status}"),
            },
        }
    }

    async fn ok_or_decode(resp: Response) -> Result<Response, CoreError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(Self::decode_error(resp).await)
        }
    }
}

// ── API response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    /// GoTrue uses `msg` / `error_description` instead of `message`.
    msg: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    full_name: Option<String>,
}

impl From<AuthUser> for Session {
    fn from(user: AuthUser) -> Self {
        Session {
            user_id: user.id,
            email: user.email,
            full_name: user.user_metadata.full_name,
        }
    }
}

#[async_trait]
impl RemoteGateway for SupabaseGateway {
    async fn get_session(&self) -> Result<Option<Session>, CoreError> {
        // Nothing persisted or restored: signed out, no network needed.
        let Some(tokens) = self.current_tokens() else {
            return Ok(None);
        };

        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::FORBIDDEN {
            return self.refresh_session(tokens).await;
        }
        let resp = Self::ok_or_decode(resp).await?;
        let user: AuthUser = resp.json().await?;
        Ok(Some(user.into()))
    }

    fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = unbounded_channel();
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.push(tx);
        rx
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = Self::decode_error(resp).await;
            return Err(CoreError::Auth(err.to_string()));
        }

        let token: TokenResponse = resp.json().await?;
        self.store_tokens(Some(StoredTokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        }));
        let session: Session = token.user.into();
        debug!(user = %session.user_id, "signed in");
        self.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let resp = self.authed(self.client.post(&url)).send().await?;
        // Tokens are cleared regardless: a 401 here just means they were
        // already invalid server-side.
        self.store_tokens(None);
        self.emit(SessionEvent::SignedOut);
        if !resp.status().is_success() && resp.status() != StatusCode::UNAUTHORIZED {
            return Err(Self::decode_error(resp).await);
        }
        Ok(())
    }

    async fn fetch_strategies(&self) -> Result<Vec<Strategy>, CoreError> {
        let url = format!(
            "{}/rest/v1/strategies?select=*&order=id.desc",
            self.base_url
        );
        let resp = self.authed(self.client.get(&url)).send().await?;
        let resp = Self::ok_or_decode(resp).await?;
        Ok(resp.json().await?)
    }

    async fn fetch_trades(&self) -> Result<Vec<Trade>, CoreError> {
        let url = format!("{}/rest/v1/trades?select=*&order=id.desc", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await?;
        let resp = Self::ok_or_decode(resp).await?;
        Ok(resp.json().await?)
    }

    async fn create_strategy(&self, draft: &Strategy) -> Result<Strategy, CoreError> {
        let url = format!("{}/rest/v1/strategies", self.base_url);
        let resp = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(draft)
            .send()
            .await?;
        let resp = Self::ok_or_decode(resp).await?;
        let mut rows: Vec<Strategy> = resp.json().await?;
        rows.pop().ok_or_else(|| CoreError::Gateway {
            code: None,
            message: "insert returned no row".to_string(),
        })
    }

    async fn create_trade(&self, draft: &Trade) -> Result<Trade, CoreError> {
        let url = format!("{}/rest/v1/trades", self.base_url);
        let resp = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(draft)
            .send()
            .await?;
        let resp = Self::ok_or_decode(resp).await?;
        let mut rows: Vec<Trade> = resp.json().await?;
        rows.pop().ok_or_else(|| CoreError::Gateway {
            code: None,
            message: "insert returned no row".to_string(),
        })
    }

    async fn update_trade(&self, trade: &Trade) -> Result<Trade, CoreError> {
        let id = trade
            .id
            .ok_or_else(|| CoreError::NotFound("trade has no id yet".to_string()))?;
        let url = format!("{}/rest/v1/trades?id=eq.{id}", self.base_url);
        let resp = self
            .authed(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(trade)
            .send()
            .await?;
        let resp = Self::ok_or_decode(resp).await?;
        let mut rows: Vec<Trade> = resp.json().await?;
        rows.pop()
            .ok_or_else(|| CoreError::NotFound(format!("trade {id}")))
    }

    async fn delete_trade(&self, id: i64) -> Result<(), CoreError> {
        let url = format!("{}/rest/v1/trades?id=eq.{id}", self.base_url);
        let resp = self.authed(self.client.delete(&url)).send().await?;
        Self::ok_or_decode(resp).await?;
        Ok(())
    }
}
