use std::path::PathBuf;

use slackhook::Result;
use slackhook::Session;
use slackhook::config::{DEFAULT_SETTINGS_FILE, Settings};
use slackhook::dispatch::ProbeOutcome;
use slackhook::telemetry::init_tracing;
use slackhook::types::LoadStatus;
use tracing::{error, info, warn};

use super::cli::{Cli, Command, TargetArgs};

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let settings_path = cli
        .settings
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let mut settings = Settings::from_env_and_file(&settings_path)?;
    if let Some(path) = cli.config_path.filter(|path| !path.trim().is_empty()) {
        settings.targets.path = path;
    }

    let mut session = Session::open(&settings)?;
    info!(status = %session.status(), path = %session.store().config_path(), "configuration state");

    let outcome = match cli.command {
        Command::List => {
            for summary in session.list_targets() {
                println!("{summary}\n");
            }
            Ok(())
        }
        Command::Check(target) => check(&mut session, &target).await,
        Command::Send { target, message } => send(&mut session, &target, &message).await,
    };

    settle(outcome, cli.strict)
}

/// Operation failures only reach the exit code under `--strict`.
fn settle(outcome: Result<()>, strict: bool) -> Result<()> {
    match outcome {
        Err(err) if !strict => {
            error!(error = %err, "operation failed");
            Ok(())
        }
        other => other,
    }
}

async fn check(session: &mut Session, target: &TargetArgs) -> Result<()> {
    select_target(session, target)?;
    match session.probe_current_target().await? {
        ProbeOutcome::Unreachable => warn!("webhook host did not accept a TCP connection"),
        outcome => info!(%outcome, "probe finished"),
    }
    Ok(())
}

async fn send(session: &mut Session, target: &TargetArgs, message: &str) -> Result<()> {
    select_target(session, target)?;
    let delivery = session.send(message).await?;
    info!(
        status = %delivery.status,
        correlation_id = %delivery.correlation_id,
        probe = %delivery.probe,
        "delivery accepted"
    );
    Ok(())
}

fn select_target(session: &mut Session, target: &TargetArgs) -> Result<()> {
    if session.status() != LoadStatus::Loaded {
        warn!(status = %session.status(), "targets file not loaded");
    }
    match target.channel.as_deref() {
        Some(channel) => session.select(channel, target.app.as_deref()).map(|_| ()),
        None => session.initialize_default().map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::settle;
    use slackhook::error::{Error as HookError, SelectError, SendError};

    fn not_found() -> HookError {
        SelectError::NotFound {
            channel: "missing".to_string(),
            app: "x".to_string(),
        }
        .into()
    }

    fn rejected() -> HookError {
        SendError::HttpStatus {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "<empty>".to_string(),
        }
        .into()
    }

    fn transport_failure() -> HookError {
        match reqwest::Client::new().post("not a url").build() {
            Err(source) => SendError::Request { source }.into(),
            Ok(_) => panic!("relative url should not build a request"),
        }
    }

    #[test]
    fn failures_are_swallowed_without_strict() {
        assert!(settle(Err(not_found()), false).is_ok());
        assert!(settle(Err(rejected()), false).is_ok());
        assert!(settle(Err(transport_failure()), false).is_ok());
        assert!(settle(Err(SendError::NoTarget.into()), false).is_ok());
    }

    #[test]
    fn strict_surfaces_failures() {
        assert!(matches!(
            settle(Err(not_found()), true),
            Err(HookError::Select(SelectError::NotFound { .. }))
        ));
        assert!(matches!(
            settle(Err(rejected()), true),
            Err(HookError::Send(SendError::HttpStatus { .. }))
        ));
        assert!(matches!(
            settle(Err(transport_failure()), true),
            Err(HookError::Send(SendError::Request { .. }))
        ));
    }

    #[test]
    fn success_passes_through() {
        assert!(settle(Ok(()), false).is_ok());
        assert!(settle(Ok(()), true).is_ok());
    }
}
