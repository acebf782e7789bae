use std::io::{self, Write};

use crate::batch::BatchResult;

const UNKNOWN_ERROR: &str = "caught unknown error";

/// Escape a message for use as workflow command data.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render an error annotation. Blank messages turn into a generic one.
pub fn error_command(message: &str) -> String {
    let message = match message.trim() {
        "" => UNKNOWN_ERROR,
        message => message,
    };
    format!("::error::{}", escape_data(message))
}

/// Messages for every failed item, prefixed with the reference that produced it.
pub fn failure_messages(result: &BatchResult) -> Vec<String> {
    result
        .failures()
        .map(|(reference, error)| format!("{}: {}", reference, error))
        .collect()
}

pub fn summary(result: &BatchResult) -> String {
    format!(
        "{} of {} references succeeded, {} failed",
        result.succeeded(),
        result.items.len(),
        result.failed(),
    )
}

/// Annotate each failure and log a summary. Returns whether the batch succeeded.
pub fn report(result: &BatchResult, out: &mut impl Write) -> io::Result<bool> {
    for message in failure_messages(result) {
        writeln!(out, "{}", error_command(&message))?;
    }

    log::info!("{}", summary(result));
    if !result.is_success() {
        log::error!(
            "Failed to delete {} of {} references",
            result.failed(),
            result.items.len(),
        );
    }

    Ok(result.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        batch::ItemResult,
        error::{ExecError, ParseError},
        executor::DeletionOutcome,
    };

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100% done\r\nnext"), "100%25 done%0D%0Anext");
    }

    #[test]
    fn test_error_command() {
        assert_eq!(error_command("boom"), "::error::boom");
        assert_eq!(error_command("  "), "::error::caught unknown error");
    }

    #[test]
    fn test_report() {
        let result = BatchResult {
            items: vec![
                ItemResult {
                    reference: "ghcr.io/frantjc/momo:a".to_string(),
                    outcome: Ok(DeletionOutcome::Deleted(1)),
                },
                ItemResult {
                    reference: "ghcr.io/frantjc".to_string(),
                    outcome: Err(ParseError::InvalidFormat("ghcr.io/frantjc".to_string()).into()),
                },
                ItemResult {
                    reference: "ghcr.io/frantjc/momo:b".to_string(),
                    outcome: Err(ExecError::Upstream(anyhow::anyhow!("line one\nline two")).into()),
                },
            ],
        };

        assert_eq!(summary(&result), "1 of 3 references succeeded, 2 failed");

        let mut out = Vec::new();
        let success = report(&result, &mut out).unwrap();

        assert!(!success);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "::error::ghcr.io/frantjc: invalid tag ghcr.io/frantjc\n\
             ::error::ghcr.io/frantjc/momo:b: failed to delete: line one%0Aline two\n"
        );
    }

    #[test]
    fn test_report_success() {
        let result = BatchResult {
            items: vec![ItemResult {
                reference: "ghcr.io/frantjc/momo:a".to_string(),
                outcome: Ok(DeletionOutcome::DeletedWholePackage),
            }],
        };

        let mut out = Vec::new();
        assert!(report(&result, &mut out).unwrap());
        assert!(out.is_empty());
    }
}
