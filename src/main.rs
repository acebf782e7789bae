use std::{env, io, process, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Config, OwnerType, DEFAULT_PACKAGE_TYPE, DEFAULT_REGISTRY};
use github::{GithubClientImpl, DEFAULT_API_URL};

mod batch;
mod config;
mod error;
mod executor;
mod github;
mod reference;
mod report;
mod resolver;

/// Delete container images from GitHub Packages by tag.
///
/// Every option can also be given as a GitHub Actions input.
#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// GitHub token.
    /// Falls back to the GITHUB_TOKEN env variable when neither --token nor --token-file is given.
    #[clap(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Path to a file containing a GitHub token
    #[clap(long)]
    token_file: Option<String>,

    /// Registry host all references must point at
    #[clap(long, env = "INPUT_REGISTRY", default_value = DEFAULT_REGISTRY)]
    registry: String,

    /// Package type of the images
    #[clap(long, env = "INPUT_PACKAGE_TYPE", default_value = DEFAULT_PACKAGE_TYPE)]
    package_type: String,

    /// Whether the owners in the references are users or organizations
    #[clap(long, env = "INPUT_OWNER_TYPE", value_enum, default_value = "user")]
    owner_type: OwnerType,

    /// Base URL of the GitHub API
    #[clap(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Timeout of a single API request in seconds
    #[clap(long, env = "INPUT_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Don't delete anything but only print what would be deleted
    #[clap(long, short = 'n', env = "INPUT_DRY_RUN", action)]
    dry_run: bool,

    /// Make logging more verbose.
    /// You can also specify the log level via the RUST_LOG env variable.
    #[clap(long, short)]
    verbose: bool,

    /// Image references to delete, e.g. ghcr.io/owner/name:tag (one per line in INPUT_TAGS)
    #[clap(env = "INPUT_TAGS", value_delimiter = '\n', required = true)]
    tags: Vec<String>,
}

#[tokio::main]
async fn main() {
    remove_blank_inputs();
    let args = Args::parse();

    if env::var("RUST_LOG").is_err() {
        let level = match args.verbose {
            true => "debug",
            false => "info",
        };
        env::set_var("RUST_LOG", format!("{}={}", env!("CARGO_CRATE_NAME"), level));
    }
    env_logger::init();

    log::info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );
    log::debug!("With arguments {:?}", env::args().collect::<Vec<_>>());

    let code = tokio::select! {
        result = run(args) => match result {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(error) => {
                log::error!("{:?}", error);
                println!("{}", report::error_command(&format!("{:#}", error)));
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Interrupted, remaining references were not processed");
            println!("{}", report::error_command("interrupted"));
            130
        }
    };

    process::exit(code);
}

async fn run(args: Args) -> Result<bool> {
    let token = read_token(args.token_file.as_deref(), args.token).await?;
    let client = GithubClientImpl::new(token, args.api_url, Duration::from_secs(args.timeout))
        .context("Failed to create github client")?;

    let references = normalize_references(args.tags);
    if references.is_empty() {
        bail!("No image references given via arguments or INPUT_TAGS");
    }

    let config = Config {
        registry: args.registry,
        package_type: args.package_type,
        owner_type: args.owner_type,
        dry_run: args.dry_run,
    };
    log::debug!("With config {:?}", config);

    let result = batch::run_batch(&client, &config, &references).await;
    let success =
        report::report(&result, &mut io::stdout().lock()).context("Failed to write report")?;

    Ok(success)
}

async fn read_token(token_file: Option<&str>, token: Option<String>) -> Result<String> {
    let token = match (token_file, token) {
        (Some(path), _) => tokio::fs::read_to_string(path)
            .await
            .context(format!("Failed to read the github token from {}", path))?,
        (None, Some(token)) => token,
        (None, None) => env::var("GITHUB_TOKEN")
            .context("No github token provided via --token, --token-file or GITHUB_TOKEN")?,
    };

    let token = token.trim().to_string();
    if token.is_empty() {
        bail!("The github token is empty");
    }
    Ok(token)
}

/// Unset action inputs that were declared but left empty, so clap applies its defaults.
fn remove_blank_inputs() {
    for (name, value) in env::vars_os() {
        let is_input = name.to_str().map_or(false, |name| name.starts_with("INPUT_"));
        let is_blank = value.to_str().map_or(false, |value| value.trim().is_empty());
        if is_input && is_blank {
            env::remove_var(name);
        }
    }
}

/// Trim references and drop blank lines, like multi-line action inputs.
fn normalize_references(tags: Vec<String>) -> Vec<String> {
    tags.iter()
        .flat_map(|tag| tag.lines())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::try_parse_from([
            "ghcr-prune",
            "--owner-type",
            "org",
            "--dry-run",
            "ghcr.io/acme/app:v1",
            "ghcr.io/acme/app:v2",
        ])
        .unwrap();

        assert_eq!(args.owner_type, OwnerType::Org);
        assert!(args.dry_run);
        assert_eq!(args.tags, vec!["ghcr.io/acme/app:v1", "ghcr.io/acme/app:v2"]);
    }

    #[test]
    #[serial]
    fn test_args_blank_inputs_use_defaults() {
        env::set_var("INPUT_DRY_RUN", "");
        env::set_var("INPUT_TIMEOUT", "");
        env::set_var("INPUT_OWNER_TYPE", "  ");

        remove_blank_inputs();
        assert!(env::var_os("INPUT_DRY_RUN").is_none());
        let args = Args::try_parse_from(["ghcr-prune", "ghcr.io/acme/app:v1"]);

        env::remove_var("INPUT_DRY_RUN");
        env::remove_var("INPUT_TIMEOUT");
        env::remove_var("INPUT_OWNER_TYPE");

        let args = args.unwrap();
        assert!(!args.dry_run);
        assert_eq!(args.timeout, 30);
        assert_eq!(args.owner_type, OwnerType::User);
    }

    #[test]
    #[serial]
    fn test_args_from_inputs() {
        env::set_var("INPUT_TAGS", "ghcr.io/acme/app:v1\nghcr.io/acme/app:v2");
        env::set_var("INPUT_DRY_RUN", "true");
        env::set_var("INPUT_TIMEOUT", "5");

        remove_blank_inputs();
        let args = Args::try_parse_from(["ghcr-prune"]);

        env::remove_var("INPUT_TAGS");
        env::remove_var("INPUT_DRY_RUN");
        env::remove_var("INPUT_TIMEOUT");

        let args = args.unwrap();
        assert!(args.dry_run);
        assert_eq!(args.timeout, 5);
        assert_eq!(
            normalize_references(args.tags),
            vec!["ghcr.io/acme/app:v1", "ghcr.io/acme/app:v2"]
        );
    }

    #[test]
    fn test_normalize_references() {
        let tags = vec![
            "ghcr.io/acme/app:v1\r\n\n  ghcr.io/acme/app:v2  \n".to_string(),
            "   ".to_string(),
            "ghcr.io/acme/app:v3".to_string(),
        ];

        assert_eq!(
            normalize_references(tags),
            vec![
                "ghcr.io/acme/app:v1",
                "ghcr.io/acme/app:v2",
                "ghcr.io/acme/app:v3",
            ]
        );
    }

    #[tokio::test]
    async fn test_read_token_prefers_explicit_token() {
        let token = read_token(None, Some(" secret\n".to_string())).await.unwrap();
        assert_eq!(token, "secret");

        let error = read_token(None, Some("  ".to_string())).await.unwrap_err();
        assert_eq!(error.to_string(), "The github token is empty");
    }

    #[tokio::test]
    async fn test_read_token_missing_file() {
        let error = read_token(Some("/nonexistent/token"), Some("secret".to_string()))
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Failed to read the github token from /nonexistent/token"
        );
    }
}
