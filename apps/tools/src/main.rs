use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{CommonsClient, ModelService, NewModelUpload, PreviewImage};
use shared::domain::PermissionLevel;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "https://modelingcommons.org/")]
    server_url: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the groups the account belongs to.
    Groups,
    /// Search existing models by name.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Only models the account may change.
        #[arg(long)]
        changeable_only: bool,
    },
    /// Upload a file as a brand-new model.
    Upload {
        name: String,
        /// Permission id: a (everyone), g (group), u (you only).
        #[arg(long, default_value = "u")]
        visibility: String,
        #[arg(long, default_value = "u")]
        changeability: String,
        #[arg(long)]
        group_id: Option<i64>,
        #[arg(long)]
        preview: Option<PathBuf>,
    },
}

fn parse_permission(id: &str) -> Result<PermissionLevel> {
    match id {
        "a" => Ok(PermissionLevel::Everyone),
        "g" => Ok(PermissionLevel::Group),
        "u" => Ok(PermissionLevel::UserOnly),
        other => bail!("unknown permission id {other:?} (expected a, g, or u)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = CommonsClient::new(&cli.server_url)?;
    let person = client.login(&cli.email, &cli.password).await?;
    println!("logged in as {}", person.display_name());

    match cli.command {
        Command::Groups => {
            for group in client.list_groups().await? {
                println!("{}\t{}", group.group_id.0, group.name);
            }
        }
        Command::Search {
            query,
            limit,
            changeable_only,
        } => {
            for model in client.search_models(&query, limit, changeable_only).await? {
                println!("{}\t{}\t{}", model.model_id.0, model.name, model.url);
            }
        }
        Command::Upload {
            name,
            visibility,
            changeability,
            group_id,
            preview,
        } => {
            let outcome = client
                .upload_model(NewModelUpload {
                    name,
                    group: group_id.map(shared::domain::GroupId),
                    visibility: parse_permission(&visibility)?,
                    changeability: parse_permission(&changeability)?,
                    preview: preview.map(PreviewImage::File),
                })
                .await?;
            match outcome.model {
                Some(model) => println!("{:?}: {} ({})", outcome.status, model.name, model.url),
                None => println!("{:?}", outcome.status),
            }
        }
    }

    Ok(())
}
