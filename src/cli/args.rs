use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_REGION: &str = "eu-west-1";

#[derive(Parser, Debug)]
#[command(
    name = "terraport",
    author,
    version,
    about = "Auto import already-existing resources into terraform state"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check planned creations against the cloud and print import commands
    Drill(DrillArgs),
}

#[derive(clap::Args, Debug)]
pub struct DrillArgs {
    /// Binary plan file, or the JSON from `terraform show -json`
    #[arg(short, long, default_value = "plan.out")]
    pub planfile: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,

    /// Delete resources that already exist instead of importing them
    #[arg(short, long)]
    pub delete: bool,

    /// Wrap import commands with `op run` so secrets come from 1Password
    #[arg(short = 'o', long)]
    pub onepassword: bool,

    /// Env file handed to `op run`
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Print a header above each import command
    #[arg(long)]
    pub output: bool,

    #[arg(long, env = "AWS_DEFAULT_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Account used to build IAM policy ARNs; looked up via STS when unset
    #[arg(long, env = "AWS_ACCOUNT_ID")]
    pub account_id: Option<String>,
}
