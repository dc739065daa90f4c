use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CONFIG_FILENAME;

#[derive(Debug, Parser)]
#[command(name = "fieldops")]
#[command(about = "Admin client for the field-operations backend")]
pub struct Cli {
    /// Config file to read
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Backend base URL
    #[arg(long, global = true, env = "FIELDOPS_BASE_URL")]
    pub base_url: Option<String>,

    /// Rows per page
    #[arg(long, global = true)]
    pub page_size: Option<u64>,

    /// Log debug output to the terminal
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a bearer token for later commands
    Login {
        /// Token to store; read from stdin when omitted
        #[arg(long)]
        token: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Manage assignors
    Assignors {
        #[command(subcommand)]
        action: AssignorCommand,
    },

    /// Manage field users
    Users {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Browse and export the work report
    Works {
        #[command(subcommand)]
        action: WorkCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum AssignorCommand {
    /// Show one page of assignors
    List(PageArgs),

    /// Create an assignor
    Add {
        name: String,
        /// Optional external identifier
        #[arg(long)]
        unique_id: Option<String>,
    },

    /// Rename an assignor
    Edit {
        id: String,
        name: String,
        #[arg(long)]
        unique_id: Option<String>,
    },

    /// Delete an assignor
    Delete(DeleteArgs),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show one page of users
    List(PageArgs),

    /// Create a user
    Add(UserArgs),

    /// Update a user
    Edit {
        id: String,
        #[command(flatten)]
        user: UserArgs,
    },

    /// Delete a user
    Delete(DeleteArgs),
}

#[derive(Debug, Subcommand)]
pub enum WorkCommand {
    /// Show one page of the work report
    List(WorkFilterArgs),

    /// Write the selected page to work_report.csv
    Export {
        #[command(flatten)]
        filters: WorkFilterArgs,
        /// Directory the CSV file is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// List the gallery image URIs of one assignment on the selected page
    Images {
        id: String,
        #[command(flatten)]
        filters: WorkFilterArgs,
    },

    /// Set the PM site id and remarks on an assignment
    Pm {
        id: String,
        #[arg(long)]
        site_id: Option<String>,
        #[arg(long)]
        comments: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: u64,
}

impl PageArgs {
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

#[derive(Debug, Clone, Args)]
pub struct WorkFilterArgs {
    #[command(flatten)]
    pub page: PageArgs,
    /// Assignor id
    #[arg(long)]
    pub assignor: Option<String>,
    /// User id
    #[arg(long)]
    pub user: Option<String>,
    /// Site id
    #[arg(long)]
    pub site: Option<String>,
    /// First day, YYYY-MM-DD or DD-MM-YYYY
    #[arg(long)]
    pub start: Option<String>,
    /// Last day, YYYY-MM-DD or DD-MM-YYYY
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UserArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub device_id: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}
