// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctl`: the operator CLI. Talks to `herdctld` over its Unix
//! socket; never touches config files or job state directly.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod env;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use herdctl_core::job::{JobId, JobStatus};
use herdctl_wire::{CancelOptions, ForkOptions, Request, Response, TriggerOptions};
use output::Format;

#[derive(Parser)]
#[command(name = "herdctl", version, about = "Operator CLI for the fleet daemon", styles = color::styles())]
struct Cli {
    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the daemon is alive.
    Ping,
    /// Trigger a job for an agent, optionally under a named schedule.
    Trigger {
        qualified_name: String,
        #[arg(long)]
        schedule: Option<String>,
        #[arg(long)]
        prompt_override: Option<String>,
        #[arg(long)]
        bypass_concurrency: bool,
    },
    /// Cancel a running job.
    Cancel {
        job_id: String,
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
    /// Fork a completed or running job into a new one.
    Fork {
        job_id: String,
        #[arg(long)]
        prompt_override: Option<String>,
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Enable a schedule.
    EnableSchedule { qualified_name: String, schedule_name: String },
    /// Disable a schedule.
    DisableSchedule { qualified_name: String, schedule_name: String },
    /// Reload the root config from disk.
    Reload,
    /// Show fleet-wide status.
    Status,
    /// Show per-agent info, optionally filtered to one agent.
    Agents { qualified_name: Option<String> },
    /// Show every agent's schedules.
    Schedules,
    /// List recent jobs, optionally filtered by agent or status.
    Jobs {
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Stream every event the daemon publishes, optionally filtered to one topic.
    Logs {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Stream events for a single agent.
    AgentLogs { qualified_name: String },
    /// Replay and stream a job's output.
    JobOutput { job_id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = if cli.json { Format::Json } else { Format::Text };
    if let Err(e) = run(cli.command, format).await {
        eprintln!("{}", color::header(&e.message));
        std::process::exit(e.code);
    }
}

async fn run(command: Commands, format: Format) -> Result<(), ExitError> {
    let mut stream = client::connect().await?;

    let request = match command {
        Commands::Ping => Request::Ping,
        Commands::Trigger { qualified_name, schedule, prompt_override, bypass_concurrency } => Request::Trigger {
            qualified_name,
            schedule_name: schedule,
            opts: TriggerOptions { prompt_override, bypass_concurrency },
        },
        Commands::Cancel { job_id, timeout_secs } => {
            Request::Cancel { job_id: parse_job_id(&job_id)?, opts: CancelOptions { timeout_secs } }
        }
        Commands::Fork { job_id, prompt_override, schedule } => Request::Fork {
            job_id: parse_job_id(&job_id)?,
            opts: ForkOptions { prompt_override, schedule_name: schedule },
        },
        Commands::EnableSchedule { qualified_name, schedule_name } => {
            Request::EnableSchedule { qualified_name, schedule_name }
        }
        Commands::DisableSchedule { qualified_name, schedule_name } => {
            Request::DisableSchedule { qualified_name, schedule_name }
        }
        Commands::Reload => Request::Reload,
        Commands::Status => Request::GetFleetStatus,
        Commands::Agents { qualified_name: Some(name) } => Request::GetAgentInfoByName { name },
        Commands::Agents { qualified_name: None } => Request::GetAgentInfo,
        Commands::Schedules => Request::GetSchedules,
        Commands::Jobs { agent, status, limit, offset } => Request::GetJobs {
            agent_qualified_name: agent,
            status: status.map(|s| parse_job_status(&s)).transpose()?,
            limit,
            offset,
        },
        Commands::Logs { filter } => return run_stream(&mut stream, Request::StreamLogs { filter }, format).await,
        Commands::AgentLogs { qualified_name } => {
            return run_stream(&mut stream, Request::StreamAgentLogs { qualified_name }, format).await
        }
        Commands::JobOutput { job_id } => {
            return run_stream(&mut stream, Request::StreamJobOutput { job_id: parse_job_id(&job_id)? }, format).await
        }
    };

    let response = client::call(&mut stream, request).await?;
    print_response(&response, format)
}

async fn run_stream(stream: &mut tokio::net::UnixStream, request: Request, format: Format) -> Result<(), ExitError> {
    let mut last_error = None;
    client::stream(stream, request, |entry| {
        if let Response::Error { message } = &entry {
            last_error = Some(message.clone());
        }
        println!("{}", output::render_stream_entry(&entry, format));
    })
    .await?;
    match last_error {
        Some(message) => Err(ExitError::new(1, message)),
        None => Ok(()),
    }
}

fn print_response(response: &Response, format: Format) -> Result<(), ExitError> {
    if let Response::Error { message } = response {
        return Err(ExitError::new(1, message.clone()));
    }
    println!("{}", output::render(response, format));
    Ok(())
}

fn parse_job_id(raw: &str) -> Result<JobId, ExitError> {
    if !JobId::is_well_formed(raw) {
        return Err(ExitError::new(2, format!("'{raw}' is not a well-formed job id")));
    }
    Ok(JobId::from_string(raw))
}

fn parse_job_status(raw: &str) -> Result<JobStatus, ExitError> {
    match raw {
        "pending" => Ok(JobStatus::Pending),
        "running" => Ok(JobStatus::Running),
        "completed" => Ok(JobStatus::Completed),
        "failed" => Ok(JobStatus::Failed),
        "cancelled" => Ok(JobStatus::Cancelled),
        other => Err(ExitError::new(2, format!("'{other}' is not a valid job status"))),
    }
}
