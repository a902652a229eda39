//! Subcommand implementations and the pieces they share.

mod configure;
mod credential;
mod disk;
mod job;
mod machine;
mod machine_image;
mod machine_volume;
mod system;
mod volume;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use tokio::time::{Instant, sleep};
use tracing::debug;

use cimi_core::{CimiClient, Job, JobStatus, QueryParams, Reference, ResourceHandle, ResourceKind};
use cimi_http::HttpTransport;

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

/// Attributes every resource carries, in display order.
pub const COMMON_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "created",
    "updated",
    "properties",
];

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store the endpoint and credentials for later commands
    Configure(configure::ConfigureArgs),

    #[command(flatten)]
    Resource(ResourceCommands),
}

/// Commands that talk to the provider.
#[derive(Subcommand, Debug)]
pub enum ResourceCommands {
    /// Systems (groups of machines, volumes and networks)
    System(system::SystemCommand),

    /// Machines
    Machine(machine::MachineCommand),

    /// Disks of a machine
    Disk(disk::DiskCommand),

    /// Volume attachments of a machine
    MachineVolume(machine_volume::MachineVolumeCommand),

    /// Machine images
    MachineImage(machine_image::MachineImageCommand),

    /// Credentials
    Credential(credential::CredentialCommand),

    /// Volumes
    Volume(volume::VolumeCommand),

    /// Provider jobs
    Job(job::JobCommand),
}

pub async fn handle(cmd: Commands, connection: &ConnectionArgs) -> Result<()> {
    let cmd = match cmd {
        Commands::Configure(args) => return configure::run(args, connection),
        Commands::Resource(cmd) => cmd,
    };

    let client = connect(connection).await?;
    match cmd {
        ResourceCommands::System(c) => system::handle(c, &client).await,
        ResourceCommands::Machine(c) => machine::handle(c, &client).await,
        ResourceCommands::Disk(c) => disk::handle(c, &client).await,
        ResourceCommands::MachineVolume(c) => machine_volume::handle(c, &client).await,
        ResourceCommands::MachineImage(c) => machine_image::handle(c, &client).await,
        ResourceCommands::Credential(c) => credential::handle(c, &client).await,
        ResourceCommands::Volume(c) => volume::handle(c, &client).await,
        ResourceCommands::Job(c) => job::handle(c, &client).await,
    }
}

async fn connect(connection: &ConnectionArgs) -> Result<CimiClient> {
    let profile = config::resolve(connection)?;
    let endpoint = profile.endpoint_url()?;
    debug!(%endpoint, "Connecting");

    let mut transport =
        HttpTransport::new(endpoint.clone()).context("Failed to build HTTP client")?;
    if let Some(credentials) = profile.credentials() {
        transport = transport.with_credentials(credentials);
    }

    CimiClient::connect(transport)
        .await
        .with_context(|| format!("Failed to connect to {}", endpoint))
}

/// Query options shared by list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Comma-separated attributes to return (`*` for all)
    #[arg(long)]
    pub select: Option<String>,

    /// Comma-separated relations to expand
    #[arg(long)]
    pub expand: Option<String>,

    /// Provider-side filter, e.g. "name='web'"
    #[arg(long)]
    pub filter: Option<String>,

    /// Index of the first member to return
    #[arg(long)]
    pub first: Option<u32>,

    /// Index of the last member to return
    #[arg(long)]
    pub last: Option<u32>,

    /// Print raw JSON, one resource per line
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Query parameters with `defaults` as the selection unless the user
    /// passed their own.
    pub fn query_params(&self, defaults: &[&str]) -> QueryParams {
        let defaults = QueryParams::builder().select_attributes(defaults).build();
        let mut user = QueryParams::builder();
        if let Some(select) = &self.select {
            user = user.select(select);
        }
        if let Some(expand) = &self.expand {
            user = user.expand(expand);
        }
        if let Some(filter) = &self.filter {
            user = user.filter(filter.clone());
        }
        if let Some(first) = self.first {
            user = user.first(first);
        }
        if let Some(last) = self.last {
            user = user.last(last);
        }
        defaults.overridden_by(&user.build())
    }
}

/// Arguments of show commands.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Name or reference of the resource
    pub resource: String,

    /// Comma-separated attributes to return
    #[arg(long)]
    pub select: Option<String>,

    /// Comma-separated relations to expand
    #[arg(long)]
    pub expand: Option<String>,

    /// Print the raw JSON representation
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn query_params(&self) -> QueryParams {
        let mut builder = QueryParams::builder();
        if let Some(select) = &self.select {
            builder = builder.select(select);
        }
        if let Some(expand) = &self.expand {
            builder = builder.expand(expand);
        }
        builder.build()
    }
}

/// Job polling options of mutating commands.
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Wait until the provider job finishes
    #[arg(long)]
    pub wait: bool,

    /// Seconds between job polls
    #[arg(long, default_value_t = 2)]
    pub interval: u64,

    /// Give up waiting after this many seconds
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,
}

/// A mutating command on one resource.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Name or reference of the resource
    pub resource: String,

    #[command(flatten)]
    pub wait: WaitArgs,
}

/// Resolve a user token to a handle, with a readable error.
pub async fn resolve<K: ResourceKind>(
    client: &CimiClient,
    token: &str,
    params: &QueryParams,
) -> Result<ResourceHandle<K>> {
    client
        .resources::<K>()
        .find_by_name_or_reference(token, params)
        .await
        .with_context(|| format!("Failed to find {} '{}'", K::NAME.to_lowercase(), token))
}

/// Resolve a token that must be a reference.
pub fn reference(token: &str) -> Result<Reference> {
    Reference::new(token).with_context(|| format!("Invalid reference '{}'", token))
}

/// Print `items` as a table of the selected columns.
pub fn print_list<K: ResourceKind>(
    items: &[ResourceHandle<K>],
    params: &QueryParams,
    columns: &[&str],
    json: bool,
) -> Result<()> {
    if json {
        for item in items {
            output::json(item.representation())?;
        }
        return Ok(());
    }
    if items.is_empty() {
        output::note(&format!("No {} found.", K::ARRAY_KEY));
        return Ok(());
    }

    let all: Vec<&str> = COMMON_COLUMNS.iter().chain(columns).copied().collect();
    if params.count_selected(&all) == 0 {
        output::note("None of the selected attributes can be shown as a column; try --json.");
        return Ok(());
    }
    let columns: Vec<&str> = all.into_iter().filter(|c| params.is_selected(c)).collect();
    let rows = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|c| match *c {
                    "id" => item
                        .id()
                        .map(str::to_string)
                        .unwrap_or_else(|| item.reference().to_string()),
                    _ => output::attribute_cell(item.representation(), c),
                })
                .collect()
        })
        .collect();
    output::list_table(&columns, rows);
    Ok(())
}

/// Print one resource: common attributes, then `typed` rows, then any
/// extension attributes.
pub fn print_resource<K: ResourceKind>(
    handle: &ResourceHandle<K>,
    params: &QueryParams,
    typed: Vec<(&str, Option<String>)>,
    json: bool,
) -> Result<()> {
    if json {
        return output::json_pretty(handle.representation());
    }

    let mut rows: Vec<(String, String)> = Vec::new();
    for column in COMMON_COLUMNS.iter().filter(|c| params.is_selected(c)) {
        let value = output::attribute_cell(handle.representation(), column);
        if !value.is_empty() {
            rows.push((column.to_string(), value));
        }
    }
    for (name, value) in typed {
        if let Some(value) = value.filter(|_| params.is_selected(name)) {
            rows.push((name.to_string(), value));
        }
    }
    for (name, value) in handle.extension_attributes() {
        if params.is_selected(name) {
            rows.push((name.to_string(), output::value_cell(value)));
        }
    }
    output::show_table(rows);
    Ok(())
}

/// Job details as show-table rows.
pub fn job_rows(job: &Job) -> Vec<(String, String)> {
    let mut rows = vec![
        ("id".to_string(), job.reference().to_string()),
        ("status".to_string(), job.status().to_string()),
    ];
    let optional = [
        ("action", job.action().map(str::to_string)),
        (
            "targetResource",
            job.target_resource().map(|r| r.to_string()),
        ),
        ("returnCode", job.return_code().map(|c| c.to_string())),
        ("statusMessage", job.status_message().map(str::to_string)),
        ("progress", job.progress().map(|p| format!("{}%", p))),
        (
            "timeOfStatusChange",
            job.time_of_status_change().map(output::timestamp),
        ),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), v))),
    );
    rows
}

/// Report the result of a mutating call and optionally wait for its job.
///
/// Fails when a waited-for job ends in anything but `SUCCESS`.
pub async fn finish(message: &str, job: Option<Job>, wait: &WaitArgs) -> Result<()> {
    output::success(message);

    let Some(mut job) = job else {
        return Ok(());
    };

    println!("Job:");
    output::show_table(job_rows(&job));

    if !wait.wait {
        return Ok(());
    }

    wait_for_job(
        &mut job,
        Duration::from_secs(wait.interval),
        Duration::from_secs(wait.timeout),
    )
    .await?;
    check_outcome(&job)
}

/// Poll `job` until it is terminal or `timeout` elapses.
pub async fn wait_for_job(job: &mut Job, interval: Duration, timeout: Duration) -> Result<()> {
    let deadline = deadline_after(timeout);
    while !job.is_terminal() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            bail!(
                "Timed out after {}s waiting for job {}",
                timeout.as_secs(),
                job.reference()
            );
        }
        sleep(interval).await;
        let status = job.refresh().await.context("Failed to refresh job")?;
        match job.progress() {
            Some(p) => output::note(&format!("Job {}: {} ({}%)", job.reference(), status, p)),
            None => output::note(&format!("Job {}: {}", job.reference(), status)),
        }
    }
    Ok(())
}

/// `None` when `timeout` reaches past what the clock can represent.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

fn check_outcome(job: &Job) -> Result<()> {
    match job.status() {
        JobStatus::Success => {
            output::success(&format!("Job {} completed", job.reference()));
            Ok(())
        }
        status => bail!(
            "Job {} ended {}{}",
            job.reference(),
            status,
            job.status_message()
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        ),
    }
}
