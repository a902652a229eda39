//! Configure command implementation.

use anyhow::{Context, Result};
use clap::Args;

use cimi_core::EndpointUrl;

use crate::cli::ConnectionArgs;
use crate::config::{Profile, storage};
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Print the stored configuration instead of changing it
    #[arg(long)]
    pub show: bool,
}

pub fn run(args: ConfigureArgs, connection: &ConnectionArgs) -> Result<()> {
    let stored = storage::load_profile()
        .context("Failed to load configuration")?
        .unwrap_or_default();

    if args.show {
        output::field("Endpoint", stored.endpoint.as_deref().unwrap_or("-"));
        output::field("Username", stored.username.as_deref().unwrap_or("-"));
        output::field(
            "Password",
            if stored.password.is_some() { "(set)" } else { "-" },
        );
        return Ok(());
    }

    let profile: Profile = stored.overridden_by(connection);
    let endpoint = profile
        .endpoint
        .as_deref()
        .context("An endpoint is required: cimi configure --endpoint <url>")?;
    EndpointUrl::new(endpoint).context("Invalid endpoint URL")?;

    let path = storage::save_profile(&profile).context("Failed to save configuration")?;

    output::success("Configuration saved");
    println!();
    output::field("Endpoint", endpoint);
    if let Some(username) = &profile.username {
        output::field("Username", username);
    }
    output::field("File", &path.display().to_string());

    Ok(())
}
