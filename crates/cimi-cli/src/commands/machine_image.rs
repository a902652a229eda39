//! Machine image commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, MachineImage, QueryParams};

use super::{ListArgs, ShowArgs, TargetArgs, finish, print_list, print_resource, resolve};

const COLUMNS: &[&str] = &["state", "type", "imageLocation"];

#[derive(Args, Debug)]
pub struct MachineImageCommand {
    #[command(subcommand)]
    pub command: MachineImageSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MachineImageSubcommand {
    /// List machine images
    List(ListArgs),

    /// Show a machine image
    Show(ShowArgs),

    /// Delete a machine image
    Delete(TargetArgs),
}

pub async fn handle(cmd: MachineImageCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        MachineImageSubcommand::List(args) => {
            let params = args.query_params(&["id", "name", "state", "type"]);
            let images = client
                .resources::<MachineImage>()
                .list(&params)
                .await
                .context("Failed to list machine images")?;
            print_list(&images, &params, COLUMNS, args.json)
        }
        MachineImageSubcommand::Show(args) => {
            let params = args.query_params();
            let image = resolve::<MachineImage>(client, &args.resource, &params).await?;
            let typed = vec![
                ("state", image.state().map(|s| s.to_string())),
                ("type", image.image_type().map(|t| t.to_string())),
                ("imageLocation", image.image_location()),
                ("relatedImage", image.related_image().map(|r| r.to_string())),
            ];
            print_resource(&image, &params, typed, args.json)
        }
        MachineImageSubcommand::Delete(args) => {
            let image =
                resolve::<MachineImage>(client, &args.resource, &QueryParams::none()).await?;
            let job = image
                .delete()
                .await
                .context("Failed to delete machine image")?;
            finish(
                &format!("MachineImage {} being deleted", image.reference()),
                job,
                &args.wait,
            )
            .await
        }
    }
}
