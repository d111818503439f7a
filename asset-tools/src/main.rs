use clap::{Parser, Subcommand};
use common::config::Config;
use common::supabase::Backend;

mod gltf;
mod jobs;
mod thumbs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // Download each 3D model and log its geometry summary
    Inspect,
    // Render placeholder thumbnails, upload them, write the URLs back
    Thumbnails,
    // Write public thumbnail URLs for already-uploaded thumbnails
    Backfill,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    // Private-bucket downloads and row updates need the service key; the
    // anon key shipped in the app is deliberately not enough for these jobs.
    let backend = Backend::new(&config.supabase_url, config.service_role_key()?);

    let outcome = match cli.command {
        Commands::Inspect => jobs::inspect_models(&backend).await?,
        Commands::Thumbnails => jobs::generate_thumbnails(&backend).await?,
        Commands::Backfill => jobs::backfill_thumbnail_urls(&backend).await?,
    };

    // Partial failure is not an error exit: rows that failed were logged
    // above and the batch can simply be rerun.
    outcome.log_summary();
    Ok(())
}
