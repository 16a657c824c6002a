pub mod init;
pub mod migrate;
pub mod serve;
pub mod taxonomy;
pub mod user;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A small blog backend", long_about = None)]
pub struct Cli {
    #[arg(short, long, env = "FOLIO_CONFIG", default_value = "folio.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new site directory with a default folio.toml
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Run migrations and start the HTTP API
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    Migrate,
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    List,
    Remove {
        username: String,
    },
    Passwd {
        username: String,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    Add {
        name: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
pub enum TagCommand {
    Add {
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    List,
}
