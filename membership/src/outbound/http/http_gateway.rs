//! Reqwest-backed membership gateway adapter.
//!
//! This adapter owns transport details only: path building, bearer
//! authentication of mutating requests, timeout and HTTP error mapping, and
//! JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    AvailableMembersEnvelope, CreateProjectMemberBody, CreatedMemberEnvelope,
    ModifyProjectMemberBody, ProjectMembersEnvelope, RemoveProjectMemberBody,
};
use crate::config::{ConfigError, GatewaySettings};
use crate::domain::ports::{
    CreateProjectMemberRequest, MembershipGateway, MembershipGatewayError,
    ModifyProjectMemberRequest, RemoveProjectMemberRequest,
};
use crate::domain::{AvailableMember, Project, ProjectId, ProjectMember, ProjectMemberId};

/// Failure to build a gateway from settings.
#[derive(Debug, thiserror::Error)]
pub enum GatewayBuildError {
    /// The settings were unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Membership gateway that talks JSON over HTTP to one service.
///
/// Reads go out unauthenticated; `POST` and `PUT` requests carry the access
/// token as a bearer credential when one is configured.
pub struct HttpMembershipGateway {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpMembershipGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// Paths are resolved relative to `base_url`, which should end in `/`.
    /// ```rust,ignore
    /// let gateway = HttpMembershipGateway::new(base_url, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            access_token: None,
        })
    }

    /// Attach `token` as the bearer credential for mutating requests.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Build an adapter from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError`] when the settings are invalid or the
    /// client cannot be constructed.
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self, GatewayBuildError> {
        let gateway = Self::new(settings.base_url()?, settings.request_timeout()?)?;
        Ok(match settings.access_token() {
            Some(token) => gateway.with_access_token(token),
            None => gateway,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, MembershipGatewayError> {
        self.base_url.join(path).map_err(|error| {
            MembershipGatewayError::invalid_request(format!("invalid request path {path}: {error}"))
        })
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match self.access_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, MembershipGatewayError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "membership service replied");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, MembershipGatewayError> {
        let body = self.send(request).await?;
        decode(&body)
    }
}

#[async_trait]
impl MembershipGateway for HttpMembershipGateway {
    async fn list_projects(&self) -> Result<Vec<Project>, MembershipGatewayError> {
        let url = self.endpoint("projects")?;
        self.fetch(self.client.get(url)).await
    }

    async fn list_project_members(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectMember>, MembershipGatewayError> {
        let url = self.endpoint(&format!("projectMembers/list/{project_id}"))?;
        let envelope: ProjectMembersEnvelope = self.fetch(self.client.get(url)).await?;
        Ok(envelope.view_project_members_by_project)
    }

    async fn list_available_members(
        &self,
        project_id: ProjectId,
        query: &str,
    ) -> Result<Vec<AvailableMember>, MembershipGatewayError> {
        let url = self.endpoint(&format!("projectMembers/availableMembers/{project_id}"))?;
        let request = self.client.get(url).query(&[("query", query)]);
        let envelope: AvailableMembersEnvelope = self.fetch(request).await?;
        Ok(envelope.view_available_members)
    }

    async fn create_project_member(
        &self,
        request: &CreateProjectMemberRequest,
    ) -> Result<ProjectMember, MembershipGatewayError> {
        let url = self.endpoint("projectMembers/create")?;
        let request = self
            .client
            .post(url)
            .json(&CreateProjectMemberBody::from(request));
        let envelope: CreatedMemberEnvelope = self.fetch(self.authorised(request)).await?;
        Ok(envelope.create_project_member)
    }

    async fn remove_project_member(
        &self,
        project_member_id: ProjectMemberId,
        request: &RemoveProjectMemberRequest,
    ) -> Result<(), MembershipGatewayError> {
        let url = self.endpoint(&format!("projectMembers/remove/{project_member_id}"))?;
        let request = self
            .client
            .put(url)
            .json(&RemoveProjectMemberBody::from(request));
        self.send(self.authorised(request)).await.map(drop)
    }

    async fn modify_project_member(
        &self,
        project_member_id: ProjectMemberId,
        request: &ModifyProjectMemberRequest,
    ) -> Result<(), MembershipGatewayError> {
        let url = self.endpoint(&format!("projectMembers/modify/{project_member_id}"))?;
        let request = self
            .client
            .put(url)
            .json(&ModifyProjectMemberBody::from(request));
        self.send(self.authorised(request)).await.map(drop)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, MembershipGatewayError> {
    serde_json::from_slice(body).map_err(|error| {
        MembershipGatewayError::decode(format!(
            "invalid membership JSON payload: {error}; body: {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> MembershipGatewayError {
    if error.is_timeout() {
        MembershipGatewayError::timeout(error.to_string())
    } else {
        MembershipGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MembershipGatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        body_preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            MembershipGatewayError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => MembershipGatewayError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn gateway(base: &str) -> HttpMembershipGateway {
        HttpMembershipGateway::new(
            Url::parse(base).expect("base URL parses"),
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case::root("http://localhost:8888/", "http://localhost:8888/projectMembers/list/3")]
    #[case::prefixed("http://svc.test/api/", "http://svc.test/api/projectMembers/list/3")]
    fn endpoints_resolve_under_the_base_url(#[case] base: &str, #[case] expected: &str) {
        let url = gateway(base)
            .endpoint(&format!("projectMembers/list/{}", ProjectId::new(3)))
            .expect("path joins");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(matches!(error, MembershipGatewayError::Timeout { .. }));
    }

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST)]
    #[case::conflict(StatusCode::CONFLICT)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR)]
    fn other_statuses_keep_their_code(#[case] status: StatusCode) {
        let error = map_status_error(status, b"{\n  \"message\": \"nope\"\n}");
        assert_eq!(
            error,
            MembershipGatewayError::status(status.as_u16(), "{ \"message\": \"nope\" }")
        );
    }

    #[test]
    fn empty_error_body_falls_back_to_the_reason_phrase() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(error, MembershipGatewayError::status(404_u16, "Not Found"));
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn malformed_payloads_map_to_decode_errors() {
        let error = decode::<Vec<Project>>(b"{\"projects\": 3}").expect_err("must fail");
        assert!(matches!(error, MembershipGatewayError::Decode { .. }));
    }
}
