//! Disk commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, Machine, QueryParams};

use super::{ListArgs, print_list, resolve};

const DEFAULT_SELECT: &[&str] = &["id", "capacity", "initialLocation"];
const COLUMNS: &[&str] = &["capacity", "initialLocation"];

#[derive(Args, Debug)]
pub struct DiskCommand {
    #[command(subcommand)]
    pub command: DiskSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DiskSubcommand {
    /// List the disks of a machine
    List(DiskListArgs),
}

#[derive(Args, Debug)]
pub struct DiskListArgs {
    /// Name or reference of the machine
    #[arg(long)]
    pub machine: String,

    #[command(flatten)]
    pub list: ListArgs,
}

pub async fn handle(cmd: DiskCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        DiskSubcommand::List(args) => {
            let params = args.list.query_params(DEFAULT_SELECT);
            let mut machine =
                resolve::<Machine>(client, &args.machine, &QueryParams::none()).await?;
            let disks = machine
                .disks(&params)
                .await
                .context("Failed to list disks")?;
            print_list(&disks, &params, COLUMNS, args.list.json)
        }
    }
}
