use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use super::BackendApi;
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Comment, CommentBody, LoginRequest, LoginResponse, NewUser, Objective, ObjectiveAssignment, User,
};
use crate::session::Session;

/// HTTP implementation of [`BackendApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    log_bodies: bool,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Session) -> ClientResult<Self> {
        let base_url = Url::parse(&config.api.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let http = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url,
            session,
            log_bodies: config.logging.log_bodies,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append escaped path segments to the base URL
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue one request and return the body of a 2xx response
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
        authenticated: bool,
    ) -> ClientResult<String> {
        let url = self.url(segments)?;
        let mut builder = self.http.request(method.clone(), url.clone());

        if authenticated {
            let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
            builder = builder.bearer_auth(token);
        }

        if method != Method::GET {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        if let Some(body) = body {
            builder = builder.json(&body);
        }

        tracing::debug!("{} {}", method, url.path());

        let response = builder.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, url.path(), e);
            ClientError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} {} returned {}", method, url.path(), status);
            if self.log_bodies {
                tracing::debug!("error body: {}", text);
            }
            return Err(ClientError::from_status(status.as_u16(), &text));
        }

        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let text = self.request(Method::GET, segments, None, true).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> ClientResult<T> {
        let text = self.request(method, segments, body, true).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Mutation whose response body is not used
    async fn send_unit(&self, method: Method, segments: &[&str], body: Option<Value>) -> ClientResult<()> {
        self.request(method, segments, body, true).await?;
        Ok(())
    }
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let text = self
            .request(Method::POST, &["auth", "login"], Some(body), false)
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn register_user(&self, user: &NewUser) -> ClientResult<()> {
        let body = serde_json::to_value(user)?;
        self.send_unit(Method::POST, &["auth", "register"], Some(body)).await
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get_json(&["users"]).await
    }

    async fn delete_user(&self, user_id: i64) -> ClientResult<()> {
        let id = user_id.to_string();
        self.send_unit(Method::DELETE, &["users", &id], None).await
    }

    async fn my_objectives(&self, year: i32) -> ClientResult<Vec<Objective>> {
        let year = year.to_string();
        self.get_json(&["objectifs", "mine", &year]).await
    }

    async fn user_objectives(&self, user_id: i64, year: i32) -> ClientResult<Vec<Objective>> {
        let id = user_id.to_string();
        let year = year.to_string();
        self.get_json(&["objectifs", &id, &year]).await
    }

    async fn assign_objective(&self, assignment: &ObjectiveAssignment) -> ClientResult<()> {
        let body = serde_json::to_value(assignment)?;
        self.send_unit(Method::POST, &["objectifs", "admin", "multiple"], Some(body))
            .await
    }

    async fn validate_objective(&self, objective_id: i64) -> ClientResult<()> {
        let id = objective_id.to_string();
        self.send_unit(Method::PUT, &["objectifs", &id, "valider"], None).await
    }

    async fn list_comments(&self, objective_id: i64) -> ClientResult<Vec<Comment>> {
        let id = objective_id.to_string();
        self.get_json(&["objectifs", &id, "commentaires"]).await
    }

    async fn add_comment(&self, objective_id: i64, contenu: &str) -> ClientResult<Comment> {
        let id = objective_id.to_string();
        let body = serde_json::to_value(CommentBody { contenu: contenu.to_string() })?;
        self.send_json(Method::POST, &["objectifs", &id, "commentaires"], Some(body))
            .await
    }

    async fn update_comment(&self, comment_id: i64, contenu: &str) -> ClientResult<Comment> {
        let id = comment_id.to_string();
        self.send_json(
            Method::PUT,
            &["objectifs", "commentaire", &id],
            Some(json!({ "contenu": contenu })),
        )
        .await
    }

    async fn delete_comment(&self, comment_id: i64) -> ClientResult<()> {
        let id = comment_id.to_string();
        self.send_unit(Method::DELETE, &["objectifs", "commentaire", &id], None)
            .await
    }
}
