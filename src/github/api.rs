use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub id: u64,
    pub name: String,
    pub metadata: PackageVersionMetadata,
}

impl PackageVersion {
    /// Tags of a container version. Other package types carry none.
    pub fn tags(&self) -> &[String] {
        match &self.metadata.container {
            Some(container) => container.tags.as_slice(),
            None => &[],
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    /// Builds a container version the way the API would report it.
    #[cfg(test)]
    pub fn container(id: u64, tags: &[&str]) -> Self {
        Self {
            id,
            name: format!("sha256:{:064x}", id),
            metadata: PackageVersionMetadata {
                package_type: "container".to_string(),
                container: Some(ContainerVersionMetadata {
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                }),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageVersionMetadata {
    pub package_type: String,
    #[serde(default)]
    pub container: Option<ContainerVersionMetadata>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContainerVersionMetadata {
    pub tags: Vec<String>,
}
