//! Strictly Quoridor - Unified CLI
//!
//! Runs the game server, a terminal client, or a hot-seat game.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, INPUT_HELP, Input};
use strictly_quoridor::{
    ClientSender, GameClient, GameServer, LocalGame, Seats, ServerConfig, ServerMessage, Transition,
    ViewModel,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Server {
            config,
            host,
            port,
            seats,
            walls,
        } => run_server(config, host, port, seats, walls).await,
        Command::Client { host, port } => run_client(host, port).await,
        Command::Local { seats } => run_local(seats).await,
    }
}

fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,strictly_quoridor=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the game server until interrupted
#[instrument(skip_all, fields(config_path = %config.display()))]
async fn run_server(
    config: std::path::PathBuf,
    host: Option<String>,
    port: Option<u16>,
    seats: Option<u8>,
    walls: Option<u8>,
) -> Result<()> {
    let mut config = ServerConfig::load_or_default(&config)?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(seats) = seats {
        config = config.with_seats(seats);
    }
    if let Some(walls) = walls {
        config = config.with_walls_per_seat(walls);
    }

    let server = GameServer::bind(&config).await?;
    info!(address = %server.local_addr()?, "Waiting for players");
    server.serve().await
}

/// Connect to a server and play from stdin
#[instrument]
async fn run_client(host: String, port: u16) -> Result<()> {
    let client = GameClient::connect((host.as_str(), port)).await?;
    let (reader, mut sender) = client.into_split();
    let (mut messages, _reader_task) = reader.forward();
    let mut view = ViewModel::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", INPUT_HELP);
    loop {
        tokio::select! {
            message = messages.recv() => {
                let Some(message) = message else {
                    println!("Server closed the connection");
                    return Ok(());
                };
                let seat = sender.player_id().unwrap_or_default();
                message.apply(&mut view, seat);
                match message {
                    ServerMessage::SetId(id) => println!("You are seat {}", id),
                    ServerMessage::BootGui => {
                        println!("All seats connected");
                        sender.request_start_coordinates().await?;
                    }
                    ServerMessage::CurrentPlayer(_)
                    | ServerMessage::Coordinate(_)
                    | ServerMessage::Error(_) => print!("{}", view.snapshot().render()),
                    _ => {}
                }
            }
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if !send_input(&mut sender, &line).await? {
                    return Ok(());
                }
            }
        }
    }
}

/// Sends a typed line; `false` once the user quits.
async fn send_input(sender: &mut ClientSender, line: &str) -> Result<bool> {
    match Input::parse(line) {
        Ok(Some(Input::Move(x, y))) => sender.send_move(x, y).await?,
        Ok(Some(Input::Wall(segment))) => sender.send_wall(segment).await?,
        Ok(Some(Input::RemoveWall(segment))) => sender.send_remove_wall(segment).await?,
        Ok(Some(Input::Available)) => sender.request_available_moves().await?,
        Ok(Some(Input::Start)) => sender.request_start_coordinates().await?,
        Ok(Some(Input::Quit)) => return Ok(false),
        Ok(None) => {}
        Err(e) => println!("{} ({})", e, INPUT_HELP),
    }
    Ok(true)
}

/// Play a hot-seat game at this terminal
#[instrument]
async fn run_local(seats: u8) -> Result<()> {
    let seats = Seats::try_from(seats)
        .map_err(|n| anyhow::anyhow!("Unsupported seat count {}, expected 2 or 4", n))?;
    let view = ViewModel::new();
    let mut game = LocalGame::new(seats, view.clone());
    game.reset_game();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", INPUT_HELP);
    print!("{}", view.snapshot().render());
    while let Some(line) = stdin.next_line().await? {
        let outcome = match Input::parse(&line) {
            Ok(Some(Input::Move(x, y))) => game.move_pawn(x, y).map(Some),
            Ok(Some(Input::Wall(segment))) => game.place_wall(segment).map(Some),
            Ok(Some(Input::RemoveWall(segment))) => game.remove_wall(segment).map(Some),
            Ok(Some(Input::Available)) => {
                game.available_moves();
                Ok(None)
            }
            Ok(Some(Input::Start)) => {
                game.start_coordinates();
                Ok(None)
            }
            Ok(Some(Input::Quit)) => break,
            Ok(None) => continue,
            Err(e) => {
                println!("{} ({})", e, INPUT_HELP);
                continue;
            }
        };
        match outcome {
            Ok(Some(Transition::Reset { winner })) => println!("Seat {} wins! New game.", winner),
            Err(e) => warn!(error = %e, "Move rejected"),
            Ok(_) => {}
        }
        print!("{}", view.snapshot().render());
    }
    Ok(())
}
