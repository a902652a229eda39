//! Credential commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use cimi_core::{CimiClient, Credential, CredentialCreate, QueryParams};

use super::system::parse_property;
use super::{ListArgs, ShowArgs, TargetArgs, WaitArgs, finish, print_list, print_resource, resolve};

#[derive(Args, Debug)]
pub struct CredentialCommand {
    #[command(subcommand)]
    pub command: CredentialSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CredentialSubcommand {
    /// List credentials
    List(ListArgs),

    /// Show a credential
    Show(ShowArgs),

    /// Create a credential
    Create(CreateArgs),

    /// Delete a credential
    Delete(TargetArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new credential
    #[arg(long)]
    pub name: Option<String>,

    /// Description of the new credential
    #[arg(long)]
    pub description: Option<String>,

    /// User name stored in the credential
    #[arg(long = "login")]
    pub user: Option<String>,

    /// Password stored in the credential
    #[arg(long = "secret", requires = "user")]
    pub password: Option<String>,

    /// Public key stored in the credential
    #[arg(long)]
    pub public_key: Option<String>,

    /// Extra property as key=value (repeatable)
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

pub async fn handle(cmd: CredentialCommand, client: &CimiClient) -> Result<()> {
    match cmd.command {
        CredentialSubcommand::List(args) => {
            let params = args.query_params(&["id", "name", "description"]);
            let credentials = client
                .resources::<Credential>()
                .list(&params)
                .await
                .context("Failed to list credentials")?;
            print_list(&credentials, &params, &[], args.json)
        }
        CredentialSubcommand::Show(args) => {
            let params = args.query_params();
            let credential = resolve::<Credential>(client, &args.resource, &params).await?;
            print_resource(&credential, &params, Vec::new(), args.json)
        }
        CredentialSubcommand::Create(args) => create(args, client).await,
        CredentialSubcommand::Delete(args) => {
            let credential =
                resolve::<Credential>(client, &args.resource, &QueryParams::none()).await?;
            let job = credential
                .delete()
                .await
                .context("Failed to delete credential")?;
            finish(
                &format!("Credential {} being deleted", credential.reference()),
                job,
                &args.wait,
            )
            .await
        }
    }
}

async fn create(args: CreateArgs, client: &CimiClient) -> Result<()> {
    if args.user.is_none() && args.public_key.is_none() {
        bail!("A credential needs --login/--secret or --public-key");
    }

    let mut payload = CredentialCreate::new();
    if let Some(name) = &args.name {
        payload = payload.name(name);
    }
    if let Some(description) = &args.description {
        payload = payload.description(description);
    }
    if let Some(user) = &args.user {
        payload = payload.user_password(user, args.password.clone().unwrap_or_default());
    }
    if let Some(key) = &args.public_key {
        payload = payload.public_key(key);
    }
    for (key, value) in &args.properties {
        payload = payload.property(key, value);
    }

    let created = client
        .resources::<Credential>()
        .create(&payload)
        .await
        .context("Failed to create credential")?;

    let message = match (&created.resource, &created.job) {
        (Some(credential), _) => format!("Credential {} created", credential.reference()),
        (None, Some(_)) => "Credential being created".to_string(),
        (None, None) => "Credential creation accepted".to_string(),
    };
    finish(&message, created.job, &args.wait).await
}
