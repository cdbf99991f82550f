use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use goban::Sign;
use trainer::persistence::sqlite::Database;
use trainer::persistence::{MoveId, MoveRecord, PositionId};
use trainer::{config, leitner, SqliteRepertoire, TrainingResult};

/// Review a Go opening repertoire with spaced repetition.
#[derive(Parser)]
#[command(name = "goban-trainer", version)]
struct Cli {
    /// Data directory holding `repertoire.db`.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Only train moves for this color (`black`, `white` or `both`).
    #[arg(long, global = true, value_name = "PLAYER")]
    player_focus: Option<Sign>,

    /// Print records as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the moves due in today's session.
    Due,
    /// Number of due moves per day.
    Schedule,
    /// Record the outcome of a training attempt.
    Train {
        move_id: MoveId,
        /// `solved`, `failed` or `alternate`.
        result: TrainingResult,
    },
    /// Replace the comment of a move.
    Comment { move_id: MoveId, text: String },
    /// Delete a move and every position only reachable through it.
    RemoveLine { move_id: MoveId },
    /// Show a stored position with its candidate moves.
    Position { position_id: PositionId },
    /// Show the session index of a day and the decks reviewed in it.
    Sessions {
        /// Defaults to today.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct SessionInfo {
    date: NaiveDate,
    session: u8,
    decks: [u8; 5],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::fmt::format::FmtSpan;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(config::get_data_dir);
    let db_path = config::database_path(&data_dir);
    tracing::info!("Using database: {}", db_path.display());

    let mut repertoire_config =
        config::repertoire_config_from_env().context("invalid player focus")?;
    if let Some(focus) = cli.player_focus {
        repertoire_config.player_focus = focus;
    }

    let db = Database::open(&db_path)
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let repertoire = SqliteRepertoire::from_database(&db, repertoire_config);

    match cli.command {
        Commands::Due => {
            let moves = repertoire.get_moves_for_current_session().await?;
            print_moves(&moves, cli.json)?;
        }
        Commands::Schedule => {
            let counts = repertoire.get_move_count_by_session_date().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                for (date, count) in counts {
                    println!("{date}  {count}");
                }
            }
        }
        Commands::Train { move_id, result } => {
            match repertoire.trained_move(move_id, result).await? {
                Some(record) => print_moves(std::slice::from_ref(&record), cli.json)?,
                None => println!("Move {move_id}: {result}, schedule unchanged"),
            }
        }
        Commands::Comment { move_id, text } => {
            let record = repertoire.update_move_comment(move_id, &text).await?;
            print_moves(std::slice::from_ref(&record), cli.json)?;
        }
        Commands::RemoveLine { move_id } => {
            let removed = repertoire.remove_line(move_id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&removed)?);
            } else {
                println!(
                    "Removed {} moves and {} positions",
                    removed.moves.len(),
                    removed.positions.len()
                );
            }
        }
        Commands::Position { position_id } => {
            let position = repertoire
                .get_position_by_id(position_id, true)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Position with id {position_id} not found"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&position)?);
            } else {
                println!(
                    "#{} {} to move, ko {}",
                    position.id, position.player, position.ko
                );
                if !position.comments.is_empty() {
                    println!("{}", position.comments);
                }
                print_moves(&position.candidate_moves, false)?;
            }
        }
        Commands::Sessions { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let session = leitner::session_for_date(date);
            let info = SessionInfo {
                date,
                session,
                decks: leitner::decks_for_session(session),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}: session {}, decks {:?}", info.date, info.session, info.decks);
            }
        }
    }

    db.pool().close().await;
    Ok(())
}

fn print_moves(moves: &[MoveRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(moves)?);
        return Ok(());
    }
    for record in moves {
        println!(
            "#{:<5} {:<9} -> position {:<5} deck {:>2}  {}/{}  {}",
            record.id,
            record.point.to_string(),
            record.position_id,
            record.deck,
            record.number_of_successes,
            record.number_of_attempts,
            record.comments
        );
    }
    Ok(())
}
