//! Retry command
//!
//! Re-runs an external command until it exits successfully, e.g. polling a
//! search endpoint until a freshly uploaded document shows up.

use std::io::{self, Write};
use std::process::ExitStatus;

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use loadgate_core::retry::{ClosurePredicate, RetryError, RetryExecutorBuilder, TracingObserver};
use loadgate_core::types::RetryPolicy;
use thiserror::Error;
use tokio::process::Command;

use crate::cli::RetryArgs;
use crate::output;

/// Why a single run of the command failed
#[derive(Error, Debug)]
pub enum AttemptError {
    /// The command could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The command ran but did not succeed
    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

impl AttemptError {
    /// A missing or non-executable program will not appear by waiting
    fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Spawn { source, .. } => !matches!(
                source.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ),
            AttemptError::Exit { .. } => true,
        }
    }
}

pub async fn run(args: RetryArgs, config_dir: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config = super::load_runtime_config(config_dir)?;
    let policy = resolve_policy(config.retry_policies.policy_for(&args.operation), &args)?;

    let (program, program_args) = args
        .command
        .split_first()
        .ok_or_else(|| anyhow!("No command given"))?;

    tracing::debug!(
        operation = %args.operation,
        max_attempts = policy.max_attempts,
        delay_ms = policy.delay_ms,
        "running command with retry"
    );

    let executor = RetryExecutorBuilder::new()
        .with_policy(policy)
        .with_predicate(ClosurePredicate::new(AttemptError::is_retryable))
        .with_observer(TracingObserver::new(args.operation.as_str()))
        .build();

    let mut attempts = 0u32;
    let result = executor
        .execute(|| {
            attempts += 1;
            run_once(program, program_args)
        })
        .await;

    // The observer logs failures and main prints the returned error
    match result {
        Ok(()) => {
            write_summary(&mut io::stdout(), program, attempts, quiet)?;
            Ok(())
        }
        Err(RetryError::Exhausted {
            attempts, source, ..
        }) => Err(anyhow!(
            "{} did not succeed after {} attempts: {}",
            program,
            attempts,
            source
        )),
        Err(RetryError::NonRetryable { source, .. }) => Err(source.into()),
    }
}

/// Success summary, suppressed by `-q`
fn write_summary<W: Write>(
    out: &mut W,
    program: &str,
    attempts: u32,
    quiet: bool,
) -> io::Result<()> {
    if quiet {
        return Ok(());
    }
    output::write_success(out, &format!("{} succeeded", program))?;
    output::write_kv(out, "attempts", &attempts.to_string())
}

/// Apply CLI overrides on top of the configured policy
fn resolve_policy(base: &RetryPolicy, args: &RetryArgs) -> Result<RetryPolicy> {
    let mut policy = base.clone();
    if let Some(attempts) = args.attempts {
        policy.max_attempts = attempts;
    }
    if let Some(delay_ms) = args.delay_ms {
        policy.delay_ms = delay_ms;
    }
    policy.validate()?;
    Ok(policy)
}

async fn run_once(program: &str, args: &[String]) -> std::result::Result<(), AttemptError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| AttemptError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(AttemptError::Exit {
            program: program.to_string(),
            status,
        })
    }
}
