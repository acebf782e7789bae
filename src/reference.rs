use std::fmt::Display;

use crate::error::ParseError;

/// A validated `registry/owner/name:tag` reference.
///
/// Ports and digests are not part of the accepted grammar: any second `:`
/// makes the reference invalid rather than being silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub registry: String,
    pub owner: String,
    /// Every path segment after the owner, joined by `/`.
    pub package_name: String,
    pub tag: String,
}

impl ImageReference {
    pub fn parse(raw: &str, expected_registry: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidFormat(raw.to_string());

        if raw.contains('@') {
            return Err(invalid());
        }

        let parts: Vec<&str> = raw.split(':').collect();
        let [path, tag] = parts[..] else {
            return Err(invalid());
        };

        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 3 {
            return Err(invalid());
        }

        let registry = segments[0];
        if registry != expected_registry {
            return Err(ParseError::WrongRegistry(
                raw.to_string(),
                expected_registry.to_string(),
            ));
        }

        let owner = segments[1];
        let package_name = segments[2..].join("/");
        if owner.is_empty() || package_name.is_empty() || tag.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            registry: registry.to_string(),
            owner: owner.to_string(),
            package_name,
            tag: tag.to_string(),
        })
    }

    /// `owner/name` without registry or tag.
    pub fn package(&self) -> String {
        format!("{}/{}", self.owner, self.package_name)
    }
}

impl Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}:{}",
            self.registry, self.owner, self.package_name, self.tag
        )
    }
}
