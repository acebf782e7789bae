use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::{fmt::Display, time::Duration};

use reqwest::{
    header::{HeaderMap, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, ClientBuilder, Response, StatusCode,
};

use super::{GithubClient, PackageVersion};
use crate::config::OwnerType;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size requested when listing package versions (the API maximum).
pub const PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOwner {
    User(String),
    Organization(String),
}

impl PackageOwner {
    pub fn new(owner_type: OwnerType, name: impl Into<String>) -> Self {
        match owner_type {
            OwnerType::User => Self::User(name.into()),
            OwnerType::Org => Self::Organization(name.into()),
        }
    }

    fn base_url(&self) -> String {
        match self {
            Self::User(user) => format!("users/{}", urlencoding::encode(user)),
            Self::Organization(org) => format!("orgs/{}", urlencoding::encode(org)),
        }
    }
}

impl Display for PackageOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(user) => f.write_str(user),
            Self::Organization(org) => f.write_str(org),
        }
    }
}

pub struct GithubClientImpl {
    client: Client,
    api_url: String,
}

impl GithubClientImpl {
    pub fn new(
        token: impl AsRef<str>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        log::debug!("{}: {}", USER_AGENT.as_str(), user_agent);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "application/vnd.github+json".try_into()?);
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", token.as_ref()).try_into()?,
        );
        headers.insert(USER_AGENT, user_agent.try_into()?);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, api_url })
    }

    fn package_url(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
    ) -> String {
        format!(
            "{api}/{base}/packages/{package_type}/{name}",
            api = self.api_url,
            base = owner.base_url(),
            name = urlencoding::encode(package_name),
        )
    }
}

/// Turn a non-success status into an error. `subject` names the missing thing on 404.
fn check_status(response: Response, subject: impl FnOnce() -> String) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(anyhow!("{} does not exist", subject()));
    } else if !status.is_success() {
        return Err(anyhow!("Server returned status {}", status));
    }
    Ok(response)
}

#[async_trait]
impl GithubClient for GithubClientImpl {
    async fn list_package_versions(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
        page: u32,
    ) -> Result<Vec<PackageVersion>> {
        let url = format!(
            "{}/versions?state=active&per_page={PER_PAGE}&page={page}",
            self.package_url(owner, package_type, package_name),
        );
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;
        let response = check_status(response, || format!("Package {}/{}", owner, package_name))?;

        let versions = response
            .json()
            .await
            .context("Failed to parse reply as json")?;

        Ok(versions)
    }

    async fn delete_package_version(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<()> {
        let url = format!(
            "{}/versions/{version_id}",
            self.package_url(owner, package_type, package_name),
        );
        log::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .context("Failed to send request")?;
        check_status(response, || {
            format!("Version {} of package {}/{}", version_id, owner, package_name)
        })?;
        Ok(())
    }

    async fn delete_package(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
    ) -> Result<()> {
        let url = self.package_url(owner, package_type, package_name);
        log::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .context("Failed to send request")?;
        check_status(response, || format!("Package {}/{}", owner, package_name))?;
        Ok(())
    }
}
