use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use peril_cli::config::ClientArgs;
use peril_cli::console::{
    listen_for_interrupt, prompt, read_word, spawn_line_reader, until_interrupted,
    watch_subscriptions, Outcome,
};
use peril_cli::logging::init_logging;
use peril_game::gamelogic::{malicious_log, parse_client_command, ClientCommand};
use peril_game::routing::{self, GameLog, EXCHANGE_PERIL_TOPIC};
use peril_game::{wiring, GameEngine, GameState, SharedEngine};
use peril_messaging_core::Publisher;
use peril_messaging_rabbitmq::RabbitBroker;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, warn};

const HELP: &str = "\
Possible commands:
* spawn <location> <rank>
    example: spawn europe infantry
* move <location> <unitID> <unitID> ...
    example: move asia 1 2
* status
* spam <n>
* help
* quit";

#[tokio::main]
async fn main() -> ExitCode {
    let args = ClientArgs::parse();
    init_logging(args.broker.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ClientArgs) -> anyhow::Result<()> {
    let mut interrupt = listen_for_interrupt();

    println!("Starting Peril client...");
    let connect = RabbitBroker::connect(args.broker.options());
    let broker = match until_interrupted(connect, &mut interrupt).await {
        Outcome::Finished(broker) => broker.context("connecting to RabbitMQ")?,
        Outcome::Interrupted => {
            say_interrupted();
            return Ok(());
        }
    };
    println!("Connected to RabbitMQ. Press Ctrl + C to exit.");

    let outcome = until_interrupted(play(&broker, args.username), &mut interrupt).await;
    broker.close().await;
    match outcome {
        Outcome::Finished(result) => result,
        Outcome::Interrupted => {
            say_interrupted();
            Ok(())
        }
    }
}

fn say_interrupted() {
    println!("\nInterrupt detected. Exiting...");
}

async fn play(broker: &RabbitBroker, username: Option<String>) -> anyhow::Result<()> {
    let mut lines = spawn_line_reader();
    let username = match username {
        Some(name) => name,
        None => match read_word(&mut lines, "Please enter your username:").await {
            Some(name) => name,
            None => return Ok(()),
        },
    };
    let engine: SharedEngine<GameState> = Arc::new(Mutex::new(GameState::new(username)?));

    let subscriptions = wiring::subscribe_client(broker, Arc::clone(&engine))
        .await
        .context("subscribing to game events")?;
    let mut stopped = watch_subscriptions(subscriptions);
    let publisher = broker
        .publisher()
        .await
        .context("opening publish channel")?;

    println!("{HELP}");
    tokio::select! {
        result = repl(&mut lines, &engine, &publisher) => result,
        Some(stop) = stopped.recv() => Err(stop.into_error()),
    }
}

async fn repl<P: Publisher>(
    lines: &mut mpsc::Receiver<String>,
    engine: &SharedEngine<GameState>,
    publisher: &P,
) -> anyhow::Result<()> {
    let username = engine.lock().await.username().to_string();

    loop {
        prompt();
        let Some(line) = lines.recv().await else {
            return Ok(());
        };
        let cmd = match parse_client_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match cmd {
            ClientCommand::Spawn { location, rank } => {
                let unit = engine.lock().await.spawn(location, rank);
                println!("Spawned a(n) {rank} in {location} with id {}", unit.id);
            }
            ClientCommand::Move { to, unit_ids } => {
                let mv = match engine.lock().await.command_move(to, &unit_ids) {
                    Ok(mv) => mv,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                let key = routing::army_moves_key(&username);
                match publisher
                    .publish_json(EXCHANGE_PERIL_TOPIC, &key, &mv)
                    .await
                {
                    Ok(()) => println!("Moved {} unit(s) to {to}", mv.units.len()),
                    Err(e) => warn!(routing_key = %key, error = %e, "move not published"),
                }
            }
            ClientCommand::Status => print_status(engine).await,
            ClientCommand::Spam(n) => {
                let key = routing::game_log_key(&username);
                for _ in 0..n {
                    let log = GameLog::now(username.clone(), malicious_log());
                    if let Err(e) = publisher
                        .publish_bincode(EXCHANGE_PERIL_TOPIC, &key, &log)
                        .await
                    {
                        warn!(routing_key = %key, error = %e, "spam log not published");
                    }
                }
                println!("Published {n} malicious logs");
            }
            ClientCommand::Help => println!("{HELP}"),
            ClientCommand::Quit => {
                println!("Goodbye!");
                return Ok(());
            }
        }
    }
}

async fn print_status(engine: &SharedEngine<GameState>) {
    let gs = engine.lock().await;
    if gs.is_paused() {
        println!("The game is paused.");
    }
    println!("You are {}, and you have these units:", gs.username());
    for unit in gs.units() {
        println!("* {}: {}, {}", unit.id, unit.location, unit.rank);
    }
}
