//! Machine volume (attachment) commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, Machine, MachineVolume, QueryParams, ResourceHandle};

use super::{ListArgs, TargetArgs, finish, print_list, reference, resolve};

const DEFAULT_SELECT: &[&str] = &["id", "volume", "initialLocation"];
const COLUMNS: &[&str] = &["volume", "initialLocation"];

#[derive(Args, Debug)]
pub struct MachineVolumeCommand {
    #[command(subcommand)]
    pub command: MachineVolumeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MachineVolumeSubcommand {
    /// List the volumes attached to a machine
    List(MachineVolumeListArgs),

    /// Detach a volume by machine volume reference
    Delete(TargetArgs),
}

#[derive(Args, Debug)]
pub struct MachineVolumeListArgs {
    /// Name or reference of the machine
    #[arg(long)]
    pub machine: String,

    #[command(flatten)]
    pub list: ListArgs,
}

pub async fn handle(cmd: MachineVolumeCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        MachineVolumeSubcommand::List(args) => {
            let params = args.list.query_params(DEFAULT_SELECT);
            let mut machine =
                resolve::<Machine>(client, &args.machine, &QueryParams::none()).await?;
            let volumes = machine
                .volumes(&params)
                .await
                .context("Failed to list machine volumes")?;
            print_list(&volumes, &params, COLUMNS, args.list.json)
        }
        MachineVolumeSubcommand::Delete(args) => {
            // Machine volumes live under a machine; only references resolve.
            let reference = reference(&args.resource)?;
            let attachment = ResourceHandle::<MachineVolume>::fetch_by_reference(
                client,
                &reference,
                &QueryParams::none(),
            )
            .await
            .context("Failed to fetch machine volume")?;
            let job = attachment
                .delete()
                .await
                .context("Failed to delete machine volume")?;
            finish(
                &format!("MachineVolume {} being deleted", attachment.reference()),
                job,
                &args.wait,
            )
            .await
        }
    }
}
