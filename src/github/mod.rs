mod api;
mod client;

use anyhow::Result;
use async_trait::async_trait;

pub use api::*;
pub use client::*;

/// The subset of the GitHub Packages API needed to remove container images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GithubClient {
    /// Fetch one page of active versions of a package. Pages start at 1.
    async fn list_package_versions(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
        page: u32,
    ) -> Result<Vec<PackageVersion>>;

    async fn delete_package_version(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<()>;

    /// Delete a package together with all of its versions.
    async fn delete_package(
        &self,
        owner: &PackageOwner,
        package_type: &str,
        package_name: &str,
    ) -> Result<()>;
}
