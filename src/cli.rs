// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bascule")]
#[command(about = "Blue-green deployments across scaling groups and deployment groups")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new bascule.yml configuration file
    Init {
        /// Application name to put in the template
        #[arg(short, long)]
        application: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the profile an environment resolves to
    Profile {
        /// Environment key (usually the branch name)
        #[arg(short, long, env = "BASCULE_ENVIRONMENT")]
        environment: Option<String>,
    },

    /// Run the full rollout against an in-memory control plane
    Rehearse {
        /// Environment key (usually the branch name)
        #[arg(short, long, env = "BASCULE_ENVIRONMENT")]
        environment: Option<String>,

        /// Make the deployment fail with this error code
        #[arg(long, value_name = "CODE")]
        fail_with: Option<String>,
    },
}
