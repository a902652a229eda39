//! Job commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, Job, JobResource};

use super::{ListArgs, job_rows, print_list, reference, wait_for_job};
use crate::output;

const COLUMNS: &[&str] = &["status", "action", "targetResource", "returnCode"];

#[derive(Args, Debug)]
pub struct JobCommand {
    #[command(subcommand)]
    pub command: JobSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum JobSubcommand {
    /// List jobs
    List(ListArgs),

    /// Show a job
    Show(JobShowArgs),

    /// Poll a job until it finishes
    Wait(JobWaitArgs),
}

#[derive(Args, Debug)]
pub struct JobShowArgs {
    /// Reference of the job
    pub job: String,

    /// Print the raw JSON representation
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct JobWaitArgs {
    /// Reference of the job
    pub job: String,

    /// Seconds between polls
    #[arg(long, default_value_t = 2)]
    pub interval: u64,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,
}

pub async fn handle(cmd: JobCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        JobSubcommand::List(args) => {
            let params = args.query_params(&["id", "status", "action", "targetResource"]);
            let jobs = client
                .resources::<JobResource>()
                .list(&params)
                .await
                .context("Failed to list jobs")?;
            print_list(&jobs, &params, COLUMNS, args.json)
        }
        JobSubcommand::Show(args) => {
            let job = Job::fetch(client, &reference(&args.job)?)
                .await
                .context("Failed to fetch job")?;
            if args.json {
                output::json_pretty(job.handle().representation())
            } else {
                output::show_table(job_rows(&job));
                Ok(())
            }
        }
        JobSubcommand::Wait(args) => {
            let mut job = Job::fetch(client, &reference(&args.job)?)
                .await
                .context("Failed to fetch job")?;
            wait_for_job(
                &mut job,
                Duration::from_secs(args.interval),
                Duration::from_secs(args.timeout),
            )
            .await?;
            output::show_table(job_rows(&job));
            super::check_outcome(&job)
        }
    }
}
