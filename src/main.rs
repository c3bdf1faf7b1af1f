use anyhow::Context;
use clap::Parser;
use portsweep::cli::Cli;
use portsweep::config::AppSettings;
use portsweep::error::{CliError, ScanError};
use portsweep::output;
use portsweep::scanner::CancelToken;
use portsweep::types::TargetError;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            debug!(error = ?e, "scan failed");
            output::print_error(&failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::load().context("loading settings")?,
    };
    debug!(?settings, "effective settings");

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let outcome = cli.scan.execute(&settings, cli.quiet, &cancel).await?;
    Ok(outcome.exit_code())
}

/// Only a failed lookup gets the "could not be resolved" wording; targets
/// rejected before any lookup keep their own message.
fn failure_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<CliError>() {
        Some(CliError::Scan(ScanError::Resolution(
            cause @ (TargetError::DnsResolutionFailed(..) | TargetError::NoIpv4Address(_)),
        ))) => format!("Hostname could not be resolved ({}). Exiting", cause),
        _ => format!("{:#}", e),
    }
}

/// Logs go to stderr so JSON and CSV on stdout stay parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portsweep={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_for(err: TargetError) -> String {
        failure_message(&CliError::Scan(ScanError::Resolution(err)).into())
    }

    #[test]
    fn test_lookup_failures_use_resolution_wording() {
        let msg = message_for(TargetError::DnsResolutionFailed(
            "nowhere.invalid".to_string(),
            "no record found".to_string(),
        ));
        assert!(msg.starts_with("Hostname could not be resolved ("));
        assert!(msg.ends_with("). Exiting"));

        let msg = message_for(TargetError::NoIpv4Address("v6only.example".to_string()));
        assert!(msg.starts_with("Hostname could not be resolved"));
    }

    #[test]
    fn test_rejected_targets_keep_their_own_message() {
        for err in [
            TargetError::Empty,
            TargetError::InvalidFormat("bad host!".to_string()),
            TargetError::Ipv6Unsupported("::1".to_string()),
        ] {
            let msg = message_for(err);
            assert!(!msg.contains("could not be resolved"), "{}", msg);
            assert!(msg.starts_with("target resolution failed"), "{}", msg);
        }
    }
}
