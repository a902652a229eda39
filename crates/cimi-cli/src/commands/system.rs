//! System commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::warn;

use cimi_core::{CimiClient, QueryParams, System, SystemCreate};

use super::{ListArgs, ShowArgs, TargetArgs, WaitArgs, finish, print_list, print_resource, resolve};
use crate::output;

const COLUMNS: &[&str] = &["state"];

#[derive(Args, Debug)]
pub struct SystemCommand {
    #[command(subcommand)]
    pub command: SystemSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SystemSubcommand {
    /// List systems
    List(ListArgs),

    /// Show a system
    Show(ShowArgs),

    /// Create a system
    Create(CreateArgs),

    /// Start a system
    Start(TargetArgs),

    /// Stop a system
    Stop(TargetArgs),

    /// Delete a system
    Delete(TargetArgs),

    /// List the machines of a system
    Machines(MachinesArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new system
    #[arg(long)]
    pub name: Option<String>,

    /// Description of the new system
    #[arg(long)]
    pub description: Option<String>,

    /// Reference of the system template to instantiate
    #[arg(long)]
    pub template: Option<String>,

    /// Extra property as key=value (repeatable)
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Args, Debug)]
pub struct MachinesArgs {
    /// Name or reference of the system
    pub system: String,

    /// Print raw JSON, one member per line
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: SystemCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        SystemSubcommand::List(args) => list(args, client).await,
        SystemSubcommand::Show(args) => show(args, client).await,
        SystemSubcommand::Create(args) => create(args, client).await,
        SystemSubcommand::Start(args) => {
            let mut system = resolve::<System>(client, &args.resource, &QueryParams::none()).await?;
            let job = system.start().await.context("Failed to start system")?;
            finish(
                &format!("System {} starting", system.reference()),
                job,
                &args.wait,
            )
            .await
        }
        SystemSubcommand::Stop(args) => {
            let mut system = resolve::<System>(client, &args.resource, &QueryParams::none()).await?;
            let job = system.stop().await.context("Failed to stop system")?;
            finish(
                &format!("System {} stopping", system.reference()),
                job,
                &args.wait,
            )
            .await
        }
        SystemSubcommand::Delete(args) => {
            let system = resolve::<System>(client, &args.resource, &QueryParams::none()).await?;
            let job = system.delete().await.context("Failed to delete system")?;
            finish(
                &format!("System {} being deleted", system.reference()),
                job,
                &args.wait,
            )
            .await
        }
        SystemSubcommand::Machines(args) => machines(args, client).await,
    }
}

async fn list(args: ListArgs, client: &CimiClient) -> Result<()> {
    let params = args.query_params(&["id", "name", "state"]);
    let systems = client
        .resources::<System>()
        .list(&params)
        .await
        .context("Failed to list systems")?;
    print_list(&systems, &params, COLUMNS, args.json)
}

async fn show(args: ShowArgs, client: &CimiClient) -> Result<()> {
    let params = args.query_params();
    let system = resolve::<System>(client, &args.resource, &params).await?;
    let typed = vec![("state", system.state().map(|s| s.to_string()))];
    print_resource(&system, &params, typed, args.json)
}

async fn create(args: CreateArgs, client: &CimiClient) -> Result<()> {
    let mut payload = SystemCreate::new();
    if let Some(name) = &args.name {
        payload = payload.name(name);
    }
    if let Some(description) = &args.description {
        payload = payload.description(description);
    }
    if let Some(template) = &args.template {
        payload = payload.template(&super::reference(template)?);
    }
    for (key, value) in &args.properties {
        payload = payload.property(key, value);
    }

    let created = client
        .resources::<System>()
        .create(&payload)
        .await
        .context("Failed to create system")?;

    if let Some(system) = &created.resource {
        return finish(
            &format!("System {} created", system.reference()),
            None,
            &args.wait,
        )
        .await;
    }
    match created.job {
        Some(job) => {
            let target = job
                .target_resource()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "(pending)".to_string());
            finish(
                &format!("System {} being created", target),
                Some(job),
                &args.wait,
            )
            .await
        }
        None => {
            output::success("System creation accepted");
            Ok(())
        }
    }
}

async fn machines(args: MachinesArgs, client: &CimiClient) -> Result<()> {
    let mut system = resolve::<System>(client, &args.system, &QueryParams::none()).await?;
    let members = system
        .machines()
        .await
        .context("Failed to list system machines")?;

    if args.json {
        for member in &members {
            output::json(member.representation())?;
        }
        return Ok(());
    }
    if members.is_empty() {
        output::note("No machines found.");
        return Ok(());
    }

    let rows = members
        .iter()
        .map(|member| {
            let machine = member.machine().unwrap_or_else(|e| {
                warn!(
                    member = %member.reference(),
                    error = %e,
                    "Ignoring malformed inline machine"
                );
                None
            });
            vec![
                member.reference().to_string(),
                member
                    .machine_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
                machine
                    .as_ref()
                    .and_then(|m| m.name())
                    .unwrap_or_default()
                    .to_string(),
                machine
                    .as_ref()
                    .and_then(|m| m.state())
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    output::list_table(&["id", "machine", "name", "state"], rows);
    Ok(())
}

/// Parses `key=value`.
pub fn parse_property(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}
