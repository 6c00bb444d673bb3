//! Registration, login, and profile calls.

use tracing::info;

use crate::api::client::PapiClient;
use crate::types::{RegisterRequest, Result, TokenResponse, User};

impl PapiClient {
    /// Registers a new account. Validation is expected to have run
    /// client-side already, but the server remains the authority and its
    /// rejections surface as request failures with field details.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let builder = self.http.post(self.url("/users/")).json(request);
        self.send_unit(builder).await
    }

    /// Logs in and establishes the session.
    ///
    /// Two sequential calls: the form-encoded token exchange (OAuth2
    /// `username` field carries the email), then a profile fetch with the
    /// fresh token. Only after both
    /// succeed is [`Session::login`](crate::session::Session::login)
    /// invoked, so a half-failed login leaves no session behind.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let form = [("username", email), ("password", password)];
        let builder = self.http.post(self.url("/auth/token")).form(&form);
        let token: TokenResponse = self.send_json(builder).await?;

        let builder = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(&token.access_token);
        let user: User = self.send_json(builder).await?;

        self.session().login(user.clone(), token.access_token)?;
        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Fetches the current user's profile with the stored token.
    pub async fn me(&self) -> Result<User> {
        let builder = self.authed(self.http.get(self.url("/auth/me")))?;
        let user: User = self.send_json(builder).await?;
        self.session().set_user(user.clone());
        Ok(user)
    }
}
