use crate::{
    config::Config,
    error::ItemError,
    executor::{execute, DeletionOutcome},
    github::GithubClient,
    reference::ImageReference,
    resolver::resolve,
};

#[derive(Debug)]
pub struct ItemResult {
    /// The reference exactly as it was given.
    pub reference: String,
    pub outcome: Result<DeletionOutcome, ItemError>,
}

/// Per-reference results, in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub items: Vec<ItemResult>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.items.iter().all(|item| item.outcome.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ItemError)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            Ok(_) => None,
            Err(error) => Some((item.reference.as_str(), error)),
        })
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Parse, resolve and delete a single reference, stopping at the first failing stage.
pub async fn process_reference(
    client: &impl GithubClient,
    config: &Config,
    raw: &str,
) -> Result<DeletionOutcome, ItemError> {
    let reference = ImageReference::parse(raw, &config.registry)?;
    let (version, versions) = resolve(client, config, &reference).await?;
    log::debug!(
        "Resolved {} to version {} ({} versions in package)",
        reference,
        version.id,
        versions.len(),
    );

    let outcome = execute(client, config, &reference, &version, &versions).await?;
    Ok(outcome)
}

/// Process every reference in order. A failing item never stops the ones after it.
pub async fn run_batch(
    client: &impl GithubClient,
    config: &Config,
    references: &[String],
) -> BatchResult {
    let mut result = BatchResult::default();

    for raw in references {
        let outcome = process_reference(client, config, raw).await;
        match &outcome {
            Ok(outcome) => log::debug!("{}: {}", raw, outcome),
            Err(error) => log::warn!("{}: {}", raw, error),
        }
        result.items.push(ItemResult {
            reference: raw.clone(),
            outcome,
        });
    }

    result
}
