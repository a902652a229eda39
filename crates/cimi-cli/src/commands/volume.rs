//! Volume commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, QueryParams, Volume};

use super::{ListArgs, ShowArgs, TargetArgs, finish, print_list, print_resource, resolve};

const COLUMNS: &[&str] = &["state", "capacity", "bootable"];

#[derive(Args, Debug)]
pub struct VolumeCommand {
    #[command(subcommand)]
    pub command: VolumeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VolumeSubcommand {
    /// List volumes
    List(ListArgs),

    /// Show a volume
    Show(ShowArgs),

    /// Delete a volume
    Delete(TargetArgs),
}

pub async fn handle(cmd: VolumeCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        VolumeSubcommand::List(args) => {
            let params = args.query_params(&["id", "name", "state", "capacity", "bootable"]);
            let volumes = client
                .resources::<Volume>()
                .list(&params)
                .await
                .context("Failed to list volumes")?;
            print_list(&volumes, &params, COLUMNS, args.json)
        }
        VolumeSubcommand::Show(args) => {
            let params = args.query_params();
            let volume = resolve::<Volume>(client, &args.resource, &params).await?;
            let typed = vec![
                ("state", volume.state().map(|s| s.to_string())),
                ("capacity", volume.capacity().map(|c| format!("{}KB", c))),
                ("bootable", volume.bootable().map(|b| b.to_string())),
            ];
            print_resource(&volume, &params, typed, args.json)
        }
        VolumeSubcommand::Delete(args) => {
            let volume = resolve::<Volume>(client, &args.resource, &QueryParams::none()).await?;
            let job = volume.delete().await.context("Failed to delete volume")?;
            finish(
                &format!("Volume {} being deleted", volume.reference()),
                job,
                &args.wait,
            )
            .await
        }
    }
}
