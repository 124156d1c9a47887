mod cli;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Drill(args) => {
            let plan = terraport::load_plan(&args.planfile).await?;
            tracing::info!(
                resource_changes = plan.resource_changes.len(),
                terraform_version = plan.terraform_version.as_deref().unwrap_or("unknown"),
                "plan loaded"
            );

            let provider = terraport::get_provider("aws", &args.provider_config()).await?;
            let options = args.drill_options();
            let report = terraport::drill(&plan, provider.as_ref(), &options).await;

            terraport::output::render(
                &report,
                &options,
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
            )?;

            let failures = report.delete_failures();
            if failures > 0 {
                bail!("{failures} deletion(s) failed");
            }
        }
    }

    Ok(())
}
