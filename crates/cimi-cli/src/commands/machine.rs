//! Machine commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, Machine, QueryParams};

use super::{ListArgs, ShowArgs, TargetArgs, finish, print_list, print_resource, resolve};

const COLUMNS: &[&str] = &["state", "cpu", "memory"];

#[derive(Args, Debug)]
pub struct MachineCommand {
    #[command(subcommand)]
    pub command: MachineSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MachineSubcommand {
    /// List machines
    List(ListArgs),

    /// Show a machine
    Show(ShowArgs),

    /// Start a machine
    Start(TargetArgs),

    /// Stop a machine
    Stop(PowerArgs),

    /// Restart a machine
    Restart(PowerArgs),

    /// Delete a machine
    Delete(TargetArgs),
}

#[derive(Args, Debug)]
pub struct PowerArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Power off instead of asking the guest to shut down
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(cmd: MachineCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        MachineSubcommand::List(args) => {
            let params = args.query_params(&["id", "name", "state", "cpu", "memory"]);
            let machines = client
                .resources::<Machine>()
                .list(&params)
                .await
                .context("Failed to list machines")?;
            print_list(&machines, &params, COLUMNS, args.json)
        }
        MachineSubcommand::Show(args) => {
            let params = args.query_params();
            let machine = resolve::<Machine>(client, &args.resource, &params).await?;
            let typed = vec![
                ("state", machine.state().map(|s| s.to_string())),
                ("cpu", machine.cpu().map(|c| c.to_string())),
                ("memory", machine.memory().map(|m| format!("{}KB", m))),
            ];
            print_resource(&machine, &params, typed, args.json)
        }
        MachineSubcommand::Start(args) => {
            let mut machine =
                resolve::<Machine>(client, &args.resource, &QueryParams::none()).await?;
            let job = machine.start().await.context("Failed to start machine")?;
            finish(
                &format!("Machine {} starting", machine.reference()),
                job,
                &args.wait,
            )
            .await
        }
        MachineSubcommand::Stop(args) => {
            let mut machine =
                resolve::<Machine>(client, &args.target.resource, &QueryParams::none()).await?;
            let job = machine
                .stop(args.force)
                .await
                .context("Failed to stop machine")?;
            finish(
                &format!("Machine {} stopping", machine.reference()),
                job,
                &args.target.wait,
            )
            .await
        }
        MachineSubcommand::Restart(args) => {
            let mut machine =
                resolve::<Machine>(client, &args.target.resource, &QueryParams::none()).await?;
            let job = machine
                .restart(args.force)
                .await
                .context("Failed to restart machine")?;
            finish(
                &format!("Machine {} restarting", machine.reference()),
                job,
                &args.target.wait,
            )
            .await
        }
        MachineSubcommand::Delete(args) => {
            let machine = resolve::<Machine>(client, &args.resource, &QueryParams::none()).await?;
            let job = machine.delete().await.context("Failed to delete machine")?;
            finish(
                &format!("Machine {} being deleted", machine.reference()),
                job,
                &args.wait,
            )
            .await
        }
    }
}
