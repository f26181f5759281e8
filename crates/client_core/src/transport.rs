//! HTTP access to the course platform API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AdminStats, CourseId, CourseSummary, User},
    error::ErrorBody,
    protocol::{AuthResponse, LoginRequest, RegisterRequest},
};
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";

#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, TransportError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, TransportError>;
    async fn current_user(&self, token: &str) -> Result<User, TransportError>;
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, TransportError>;
    async fn course(&self, course_id: &CourseId) -> Result<CourseSummary, TransportError>;
    async fn admin_stats(&self, token: &str) -> Result<AdminStats, TransportError>;
    async fn instructor_courses(&self, token: &str) -> Result<Vec<CourseSummary>, TransportError>;
}

pub struct HttpPortalApi {
    http: Client,
    base_url: Url,
}

impl HttpPortalApi {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&normalize_base_url(base_url)?)?;
        Ok(Self { http, base_url })
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path to extend.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Validates `raw` as an absolute http(s) URL and strips trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, url::ParseError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(url::ParseError::RelativeUrlWithoutBase);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(TransportError::Rejected {
            status: status.as_u16(),
            detail: ErrorBody::parse(&body).message().map(str::to_string),
        });
    }
    serde_json::from_slice(&body).map_err(|err| TransportError::Decode(err.to_string()))
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, TransportError> {
        let res = self
            .http
            .post(self.endpoint(&["api", "auth", "login"]))
            .json(request)
            .send()
            .await?;
        read_json(res).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, TransportError> {
        let res = self
            .http
            .post(self.endpoint(&["api", "auth", "register"]))
            .json(request)
            .send()
            .await?;
        read_json(res).await
    }

    async fn current_user(&self, token: &str) -> Result<User, TransportError> {
        let res = self
            .http
            .get(self.endpoint(&["api", "auth", "me"]))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(res).await
    }

    async fn list_courses(&self) -> Result<Vec<CourseSummary>, TransportError> {
        let res = self.http.get(self.endpoint(&["api", "courses"])).send().await?;
        read_json(res).await
    }

    async fn course(&self, course_id: &CourseId) -> Result<CourseSummary, TransportError> {
        let res = self
            .http
            .get(self.endpoint(&["api", "courses", course_id.0.as_str()]))
            .send()
            .await?;
        read_json(res).await
    }

    async fn admin_stats(&self, token: &str) -> Result<AdminStats, TransportError> {
        let res = self
            .http
            .get(self.endpoint(&["api", "admin", "stats"]))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(res).await
    }

    async fn instructor_courses(&self, token: &str) -> Result<Vec<CourseSummary>, TransportError> {
        let res = self
            .http
            .get(self.endpoint(&["api", "instructor", "courses"]))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(res).await
    }
}
