use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, BufRead, Write};

use city_block::simulation::{Session, SimError, StepResult};

#[derive(Parser)]
#[command(name = "city_block")]
#[command(about = "Walk a city block grid against its crossing signals")]
struct Cli {
    /// Intersections along the x axis
    #[arg(long, default_value = "4")]
    width: u32,

    /// Intersections along the y axis
    #[arg(long, default_value = "7")]
    height: u32,

    /// Seed for reproducible signal timings and start/end corners
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated move indices to play instead of reading stdin
    #[arg(long, value_delimiter = ',')]
    moves: Option<Vec<usize>>,

    /// Print the intersection data as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Don't draw the map between moves
    #[arg(long)]
    no_map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,city_block=info"),
    )
    .init();

    let cli = Cli::parse();

    let mut session = match cli.seed {
        Some(seed) => Session::new_with_seed(cli.width, cli.height, seed),
        None => Session::new(cli.width, cli.height),
    }
    .context("Failed to create city grid")?;

    if cli.dump {
        let json = session
            .intersections_json()
            .context("Failed to serialize intersections")?;
        println!("{}", json);
        return Ok(());
    }

    show(&session, cli.no_map);

    if session.is_complete() {
        // Start and end can share a corner on a single-block grid
        report_arrival(&session);
    } else {
        match cli.moves {
            Some(moves) => run_scripted(&mut session, &moves, cli.no_map),
            None => run_interactive(&mut session, cli.no_map)?,
        }
    }

    println!("=== Final State ===");
    session.print_summary();
    Ok(())
}

fn show(session: &Session, no_map: bool) {
    session.print_summary();
    if !no_map {
        session.draw_map();
    }
}

fn report_arrival(session: &Session) {
    println!("Reached the end corner in {} moves", session.moves_taken());
}

/// Apply one move and report it. Returns false when the walk should stop.
fn play(session: &mut Session, index: usize, no_map: bool) -> bool {
    match session.step(index) {
        Ok(StepResult {
            position,
            cost,
            total_time,
            arrived,
            ..
        }) => {
            println!(
                "Moved to {} for {} (total time {})",
                position, cost, total_time
            );
            if arrived {
                report_arrival(session);
                return false;
            }
            show(session, no_map);
            true
        }
        Err(e @ SimError::InvalidMove { .. }) => {
            println!("Invalid move chosen: {}", e);
            false
        }
        Err(e) => {
            println!("Move failed: {}", e);
            false
        }
    }
}

fn run_scripted(session: &mut Session, moves: &[usize], no_map: bool) {
    info!("Playing {} scripted moves", moves.len());
    for &index in moves {
        if !play(session, index, no_map) {
            break;
        }
    }
}

fn run_interactive(session: &mut Session, no_map: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Choose a move index: ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read move from stdin")?;

        let keep_going = match line.trim().parse::<usize>() {
            Ok(index) => play(session, index, no_map),
            Err(_) => {
                println!("Invalid move chosen: {:?} is not a move index", line.trim());
                false
            }
        };
        if !keep_going {
            break;
        }
    }
    Ok(())
}
