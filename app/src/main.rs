use clap::{Parser, Subcommand};
use common::config::Config;
use common::models::{AppUpdate, UserStats};
use common::progress;
use common::supabase::Backend;
use std::env;
use std::path::Path;
use tracing::info;

use crate::home::HomeScreen;
use crate::settings::{mask_email, Settings, SETTINGS_FILE};

mod feed;
mod home;
mod limiter;
mod settings;
mod viewer;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // Full home screen: stats, recent finds, leaderboard, updates
    Home,
    // Announcements feed only
    Updates,
    // Send a password-reset email for the configured account
    ResetPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let mut backend = Backend::new(&config.supabase_url, &config.supabase_anon_key);

    let mut settings = Settings::load(Path::new(SETTINGS_FILE));
    let email = env::var("APP_EMAIL").map_err(|_| anyhow::anyhow!("APP_EMAIL must be set"))?;

    // Reset runs before sign-in; the whole point is a lost password
    if let Commands::ResetPassword = cli.command {
        backend.request_password_reset(&email).await?;
        settings.reset_flow_active = true;
        info!("Reset email sent to {}", mask_email(&email));
        println!("Check {} for the reset link.", mask_email(&email));
        return Ok(());
    }

    let password =
        env::var("APP_PASSWORD").map_err(|_| anyhow::anyhow!("APP_PASSWORD must be set"))?;

    let session = backend.sign_in(&email, &password).await?;
    info!("Signed in as {}", session.user.id);

    match cli.command {
        Commands::Home => {
            let mut screen = HomeScreen::new(backend, session.user.id);
            screen.load().await;
            render_home(&screen, &settings);
        }
        Commands::Updates => {
            let updates = home::fetch_active_updates(&backend).await;
            render_updates(&updates);
        }
        _ => {}
    }

    Ok(())
}

fn render_home(screen: &HomeScreen, settings: &Settings) {
    let state = &screen.state;

    if let Some(profile) = &state.profile {
        if let Some(email) = profile.email.as_deref() {
            let shown = if settings.obfuscate_email {
                mask_email(email)
            } else {
                email.to_string()
            };
            println!("Signed in: {}", shown);
        }
    }

    match &state.stats {
        Some(stats) => render_stats(stats),
        None => println!("Stats unavailable"),
    }

    println!();
    println!("Recent finds:");
    if state.recent.is_empty() {
        println!("  (none yet)");
    }
    for row in &state.recent {
        if let Some(item) = &row.nft {
            print!(
                "  {} [{}] collected {}",
                item.name,
                item.rarity,
                row.collected_at.format("%Y-%m-%d %H:%M")
            );
            let model_url = item
                .image_url
                .as_deref()
                .filter(|url| url.ends_with(".glb") || url.ends_with(".gltf"));
            match model_url {
                Some(url) => println!("  view: {}", viewer::viewer_url(url)),
                None => println!(),
            }
        }
    }

    println!();
    println!("Leaderboard:");
    if state.leaderboard.is_empty() {
        println!("  (unavailable)");
    }
    for entry in &state.leaderboard {
        println!("  #{} {} - {}", entry.rank, entry.username, entry.score);
    }

    println!();
    render_updates(&state.updates);
}

fn render_stats(stats: &UserStats) {
    let filled = (progress::progress_ratio(stats.level, stats.experience) * 20.0).round() as usize;
    println!("Level {}", stats.level);
    println!(
        "[{}{}] {}/{} XP, {} to next level",
        "#".repeat(filled),
        "-".repeat(20 - filled),
        progress::progress_in_level(stats.level, stats.experience),
        progress::XP_PER_LEVEL,
        progress::xp_to_next_level(stats.level, stats.experience)
    );
    println!(
        "Collected: {} ({} common, {} rare, {} epic, {} legendary)",
        stats.total_nfts, stats.common_nfts, stats.rare_nfts, stats.epic_nfts, stats.legendary_nfts
    );
    println!(
        "Today: {}  This week: {}  Streak: {} days  Distance: {:.1} km  Coins: {}",
        stats.nfts_today,
        stats.nfts_this_week,
        stats.daily_streak,
        stats.total_distance_km,
        stats.coins
    );
    if let Some(rank) = stats.rank {
        println!("Leaderboard rank: #{}", rank);
    }
}

fn render_updates(updates: &[AppUpdate]) {
    println!("Updates:");
    if updates.is_empty() {
        println!("  (nothing right now)");
    }
    for update in updates {
        println!("  [{}] {} - {}", update.kind, update.title, update.description);
        if let Some(action) = &update.action_url {
            println!("        {}", action);
        }
    }
}
