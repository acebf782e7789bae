use std::fmt::Display;

use crate::{
    config::Config,
    error::ExecError,
    github::{GithubClient, PackageOwner, PackageVersion},
    reference::ImageReference,
    resolver::PackageVersionSet,
};

/// Which registry object has to go for a reference to disappear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPlan {
    Version(u64),
    /// The version is the package's last one, so the package goes with it.
    WholePackage,
}

impl DeletionPlan {
    pub fn new(version: &PackageVersion, versions: &PackageVersionSet) -> Self {
        if versions.len() == 1 {
            Self::WholePackage
        } else {
            Self::Version(version.id)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted(u64),
    DeletedWholePackage,
    /// Nothing was deleted because of `--dry-run`.
    DryRun(DeletionPlan),
}

impl Display for DeletionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deleted(id) => write!(f, "deleted version {id}"),
            Self::DeletedWholePackage => f.write_str("deleted package"),
            Self::DryRun(DeletionPlan::Version(id)) => write!(f, "would delete version {id}"),
            Self::DryRun(DeletionPlan::WholePackage) => f.write_str("would delete package"),
        }
    }
}

pub async fn execute(
    client: &impl GithubClient,
    config: &Config,
    reference: &ImageReference,
    version: &PackageVersion,
    versions: &PackageVersionSet,
) -> Result<DeletionOutcome, ExecError> {
    let owner = PackageOwner::new(config.owner_type, &reference.owner);
    let plan = DeletionPlan::new(version, versions);

    let dry_run_suffix = match config.dry_run {
        true => " (DRY RUN)",
        false => "",
    };
    match plan {
        DeletionPlan::Version(id) => log::info!(
            "Deleting version {} ({}) of {} for tag {}{}",
            id,
            version.name,
            reference.package(),
            reference.tag,
            dry_run_suffix,
        ),
        DeletionPlan::WholePackage => log::info!(
            "Deleting package {} with its last version {} for tag {}{}",
            reference.package(),
            version.id,
            reference.tag,
            dry_run_suffix,
        ),
    }

    if config.dry_run {
        return Ok(DeletionOutcome::DryRun(plan));
    }

    let package_type = config.package_type.as_str();
    let package_name = reference.package_name.as_str();
    match plan {
        DeletionPlan::Version(id) => {
            client
                .delete_package_version(&owner, package_type, package_name, id)
                .await
                .map_err(ExecError::Upstream)?;
            Ok(DeletionOutcome::Deleted(id))
        }
        DeletionPlan::WholePackage => {
            client
                .delete_package(&owner, package_type, package_name)
                .await
                .map_err(ExecError::Upstream)?;
            Ok(DeletionOutcome::DeletedWholePackage)
        }
    }
}
