use clap::ValueEnum;

pub const DEFAULT_REGISTRY: &str = "ghcr.io";
pub const DEFAULT_PACKAGE_TYPE: &str = "container";

/// Whether packages belong to a personal account or to an organization.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerType {
    User,
    Org,
}

/// Settings shared by every item of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Registry host every reference must point at.
    pub registry: String,
    pub package_type: String,
    pub owner_type: OwnerType,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            package_type: DEFAULT_PACKAGE_TYPE.to_string(),
            owner_type: OwnerType::User,
            dry_run: false,
        }
    }
}
