use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topspin::api::state::AppState;
use topspin::calculate::{
    attendance_stats, compute_player_stats, rank_overall, round_robin_pairs, rounded_percent,
};
use topspin::commentary::backend::create_backend;
use topspin::config::AppConfig;
use topspin::models::{MatchSubmission, Player, PlayerId};
use topspin::storage::{ClubStore, MatchFilter, StorageConfig};

#[derive(Parser)]
#[command(name = "topspin")]
#[command(about = "Table-tennis club tracker: match log, rankings and attendance")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the overall standings table
    Standings {
        /// Start of the day range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End of the day range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Include players with no recorded matches
        #[arg(long)]
        all: bool,
    },

    /// Print the attendance table
    Attendance,

    /// Print a round-robin pairing order for the named players
    Schedule {
        /// Player names (two or more)
        names: Vec<String>,
    },

    /// List the roster
    Players,

    /// Register a player
    AddPlayer {
        #[arg(long)]
        name: String,

        /// Division level, 1-9
        #[arg(long, default_value = "5")]
        level: u8,
    },

    /// Record a match result (winner is derived from the set counts)
    AddMatch {
        /// First player's name
        #[arg(long)]
        player_a: String,

        /// Sets taken by the first player
        #[arg(long)]
        sets_a: u32,

        /// Second player's name
        #[arg(long)]
        player_b: String,

        /// Sets taken by the second player
        #[arg(long)]
        sets_b: u32,

        /// Match day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a recorded match
    DeleteMatch {
        /// Match id as shown in listings
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config if present, fall back to defaults otherwise
    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)
            .with_context(|| format!("loading config from {:?}", config_path))?
    } else {
        AppConfig::default()
    };

    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let tz = config.club.timezone;
    let mut store = ClubStore::new(StorageConfig::new(data_dir), tz);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let backend = create_backend(&config.commentary);
            let state = AppState::new(store, config.club.clone(), Arc::from(backend));
            let app = topspin::api::build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Club tracker listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }

        Commands::Standings { from, to, all } => {
            let filter = MatchFilter {
                from: from.as_deref().map(parse_day).transpose()?,
                to: to.as_deref().map(parse_day).transpose()?,
                player: None,
            };
            let players = store.list_players()?;
            let matches = store.list_matches(&filter)?;

            let mut stats = compute_player_stats(&players, &matches, all);
            rank_overall(&mut stats);

            if stats.is_empty() {
                println!("No matches recorded.");
                return Ok(());
            }

            println!(
                "{:<5} {:<20} {:>3} {:>3} {:>5} {:>6} {:>7}  {}",
                "Rank", "Player", "W", "L", "Rate", "Sets", "Streak", "Form"
            );
            for (i, s) in stats.iter().enumerate() {
                let form: String = s.recent_form.iter().map(|o| o.to_string()).collect();
                println!(
                    "{:<5} {:<20} {:>3} {:>3} {:>4}% {:>+6} {:>7}  {}",
                    i + 1,
                    s.name,
                    s.wins,
                    s.losses,
                    rounded_percent(s.win_rate),
                    s.set_diff(),
                    s.current_streak,
                    form
                );
            }
        }

        Commands::Attendance => {
            let players = store.list_players()?;
            let matches = store.list_matches(&MatchFilter::all())?;
            let stats = attendance_stats(&players, &matches, tz, config.club.attendance_window);

            if stats.is_empty() {
                println!("No players registered.");
                return Ok(());
            }

            println!(
                "{:<20} {:>6} {:>6} {:>5}  {}",
                "Player", "Days", "Total", "Rate", "Recent"
            );
            for s in &stats {
                let recent: String = s
                    .recent
                    .iter()
                    .map(|d| if d.attended { 'O' } else { '.' })
                    .collect();
                println!(
                    "{:<20} {:>6} {:>6} {:>4}%  {}",
                    s.name,
                    s.attendance_count,
                    s.total_match_days,
                    rounded_percent(s.attendance_rate),
                    recent
                );
            }
        }

        Commands::Schedule { names } => {
            if names.len() < 2 {
                bail!("need at least two player names");
            }
            let players = store.list_players()?;
            let mut selected: Vec<PlayerId> = Vec::with_capacity(names.len());
            for name in &names {
                selected.push(resolve_player(&players, name)?.id);
            }

            let pairs = round_robin_pairs(&selected);
            println!("=== Round robin ({} pairs) ===\n", pairs.len());
            for (i, (home, away)) in pairs.iter().enumerate() {
                let home = players.iter().find(|p| p.id == *home).unwrap();
                let away = players.iter().find(|p| p.id == *away).unwrap();
                println!("{:>3}. {} vs {}", i + 1, home.name, away.name);
            }
        }

        Commands::Players => {
            let players = store.list_players()?;
            if players.is_empty() {
                println!("No players registered.");
                return Ok(());
            }
            println!("{:<20} {:>5}  {}", "Player", "Level", "Id");
            for p in &players {
                println!("{:<20} {:>5}  {}", p.name, p.level, p.id);
            }
        }

        Commands::AddPlayer { name, level } => {
            let player = store.add_player(&name, level)?;
            println!("Registered {} (level {}): {}", player.name, player.level, player.id);
        }

        Commands::AddMatch {
            player_a,
            sets_a,
            player_b,
            sets_b,
            date,
        } => {
            let players = store.list_players()?;
            let a = resolve_player(&players, &player_a)?;
            let b = resolve_player(&players, &player_b)?;

            let match_date = match date.as_deref() {
                Some(raw) => day_to_timestamp(parse_day(raw)?, tz)?,
                None => Utc::now(),
            };

            let submission = MatchSubmission {
                match_date,
                player_a: a.id,
                sets_a,
                player_b: b.id,
                sets_b,
            };
            let record = store.insert_match(&submission)?;

            let winner = if record.winner_id == a.id { &a } else { &b };
            let loser = if record.loser_id == a.id { &a } else { &b };
            println!(
                "Recorded: {} beat {} {}-{} on {} ({})",
                winner.name,
                loser.name,
                record.winner_sets,
                record.loser_sets,
                record.local_day(tz),
                record.id
            );
        }

        Commands::DeleteMatch { id } => {
            store.delete_match(&id.as_str().into())?;
            println!("Deleted match {}", id);
        }
    }

    Ok(())
}

/// Parse a YYYY-MM-DD day.
fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date (expected YYYY-MM-DD): {}", raw))
}

/// Midday in the club's timezone, so the timestamp lands on the intended
/// calendar day regardless of DST edges.
fn day_to_timestamp(day: NaiveDate, tz: chrono_tz::Tz) -> Result<chrono::DateTime<Utc>> {
    let noon = day
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("invalid time of day"))?;
    tz.from_local_datetime(&noon)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("ambiguous local time for {}", day))
}

/// Find a roster member by exact name.
fn resolve_player<'a>(players: &'a [Player], name: &str) -> Result<&'a Player> {
    let mut hits = players.iter().filter(|p| p.name == name);
    let player = hits
        .next()
        .ok_or_else(|| anyhow!("no player named '{}'", name))?;
    if hits.next().is_some() {
        bail!(
            "several players are named '{}'; use the roster ids (see `topspin players`)",
            name
        );
    }
    Ok(player)
}
