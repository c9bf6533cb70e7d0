use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "everhour-tui")]
#[command(about = "Terminal UI for Everhour time tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the Everhour API (default)
    Run,
    /// Run with local in-memory data
    Dev,
    /// Store an Everhour API token
    SetToken,
    /// Remove the stored API token
    ClearToken,
    /// Link the current directory to a project
    Link {
        /// Everhour project id, e.g. "ev:1234"
        project_id: String,
    },
    /// Start or stop the timer for a task
    Toggle {
        /// Everhour task id
        task_id: String,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}
