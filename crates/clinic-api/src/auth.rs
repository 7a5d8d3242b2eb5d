//! Authentication endpoints

use std::sync::Arc;

use tracing::debug;

use clinic_http::{ApiTransport, Request};
use clinic_session::Session;

use crate::error::{ApiError, Result};
use crate::models::{ApiMessage, Credentials, LoginOutcome, UserInfo};

/// Login, logout and current-user operations
pub struct AuthApi {
    transport: Arc<dyn ApiTransport>,
    session: Session,
}

impl AuthApi {
    pub fn new(transport: Arc<dyn ApiTransport>, session: Session) -> Self {
        Self { transport, session }
    }

    /// Exchange credentials for a session
    ///
    /// On success the backend either sets cookies (gateway deployments) or
    /// returns the token pair in the body; a returned pair is stored in the
    /// session. The role is fetched separately via [`Self::me`].
    pub async fn login(&self, credentials: &Credentials) -> Result<ApiMessage> {
        let request = Request::post("/auth/login").json(credentials)?;
        let value = self.transport.dispatch(request).await?;
        let LoginOutcome {
            success,
            message,
            tokens,
        } = serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        if success {
            debug!("login accepted");
            if let Some(tokens) = tokens {
                self.session.set_tokens(tokens);
            }
        }
        Ok(ApiMessage { success, message })
    }

    /// Fetch the current user and remember the role in the session
    pub async fn me(&self) -> Result<UserInfo> {
        let value = self.transport.dispatch(Request::get("/users/me")).await?;
        let info: UserInfo =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.session.set_role(&info.role);
        Ok(info)
    }

    /// Startup path: restore persisted credentials, then validate them by
    /// fetching the current user.
    pub async fn handshake(&self) -> Result<Option<UserInfo>> {
        let restored = self.session.restore()?;
        if !restored && !self.session.is_authenticated() {
            debug!("no persisted session to hand back");
            return Ok(None);
        }
        let info = self.me().await?;
        Ok(Some(info))
    }

    /// Tell the backend goodbye, then drop the session
    ///
    /// The session is invalidated even when the logout call itself fails;
    /// the user asked to leave.
    pub async fn logout(&self) -> Result<()> {
        let result = self.transport.dispatch(Request::post("/auth/logout")).await;
        self.session.logout();
        result?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_returns_envelope_and_keeps_tokens() {
        let transport = Arc::new(StubTransport::replying(json!({
            "success": true,
            "message": "all good",
            "access_token": "a1",
            "refresh_token": "r1"
        })));
        let session = Session::new();
        let auth = AuthApi::new(transport.clone(), session.clone());

        let message = auth
            .login(&Credentials {
                username: "user@clinic.org".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert!(message.success);
        assert_eq!(session.access_token(), "a1");

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/auth/login");
        assert_eq!(sent[0].method, clinic_http::Method::POST);
    }

    #[tokio::test]
    async fn test_login_without_tokens_leaves_session_alone() {
        let transport = Arc::new(StubTransport::replying(json!({
            "success": true,
            "message": "all good"
        })));
        let session = Session::new();
        let auth = AuthApi::new(transport, session.clone());

        auth.login(&Credentials {
            username: "user@clinic.org".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_me_stores_role() {
        let transport = Arc::new(StubTransport::replying(json!({"role": "nurse"})));
        let session = Session::new();
        let auth = AuthApi::new(transport, session.clone());

        let info = auth.me().await.unwrap();
        assert_eq!(info.role, "nurse");
        assert_eq!(session.role(), "nurse");
    }

    #[tokio::test]
    async fn test_logout_invalidates_session_even_on_failure() {
        let transport = Arc::new(StubTransport::failing());
        let session = Session::new();
        session.set_tokens(clinic_session::TokenPair {
            access_token: "a1".to_string(),
            refresh_token: "r1".to_string(),
        });
        let auth = AuthApi::new(transport, session.clone());

        assert!(auth.logout().await.is_err());
        assert!(!session.is_authenticated());
    }
}
