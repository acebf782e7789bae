use crate::{
    config::Config,
    error::ResolveError,
    github::{GithubClient, PackageOwner, PackageVersion, PER_PAGE},
    reference::ImageReference,
};

/// Upper bound on listing requests for a single package.
pub const MAX_PAGES: u32 = 100;

/// Every active version of one package, in the order the registry listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersionSet(Vec<PackageVersion>);

impl PackageVersionSet {
    pub fn new(versions: Vec<PackageVersion>) -> Self {
        Self(versions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageVersion> {
        self.0.iter()
    }

    /// First version carrying `tag`. Later matches are only logged.
    pub fn find_tag(&self, tag: &str) -> Option<&PackageVersion> {
        let mut matches = self.iter().filter(|version| version.has_tag(tag));
        let found = matches.next()?;

        let others: Vec<u64> = matches.map(|version| version.id).collect();
        if !others.is_empty() {
            log::warn!(
                "Tag {} is attached to several versions, using {} and ignoring {:?}",
                tag,
                found.id,
                others,
            );
        }

        Some(found)
    }
}

/// Fetch every active version of a package, following pages until a short one.
pub async fn list_all_versions(
    client: &impl GithubClient,
    owner: &PackageOwner,
    package_type: &str,
    package_name: &str,
) -> Result<PackageVersionSet, ResolveError> {
    let mut versions = Vec::new();

    for page in 1..=MAX_PAGES {
        let batch = client
            .list_package_versions(owner, package_type, package_name, page)
            .await
            .map_err(ResolveError::Upstream)?;
        log::debug!(
            "Page {} of {}/{} has {} versions",
            page,
            owner,
            package_name,
            batch.len(),
        );

        let last = batch.len() < PER_PAGE;
        versions.extend(batch);
        if last {
            return Ok(PackageVersionSet::new(versions));
        }
    }

    Err(ResolveError::PageLimit(MAX_PAGES))
}

/// Find the version `reference` points at, along with all versions of its package.
pub async fn resolve(
    client: &impl GithubClient,
    config: &Config,
    reference: &ImageReference,
) -> Result<(PackageVersion, PackageVersionSet), ResolveError> {
    let owner = PackageOwner::new(config.owner_type, &reference.owner);
    let versions =
        list_all_versions(client, &owner, &config.package_type, &reference.package_name).await?;

    match versions.find_tag(&reference.tag) {
        Some(version) => Ok((version.clone(), versions)),
        None => Err(ResolveError::TagNotFound(reference.clone())),
    }
}
