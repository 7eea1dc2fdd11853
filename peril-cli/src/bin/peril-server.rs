use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use peril_cli::config::ServerArgs;
use peril_cli::console::{
    listen_for_interrupt, prompt, spawn_line_reader, until_interrupted, watch_subscriptions,
    Outcome,
};
use peril_cli::logging::init_logging;
use peril_game::gamelogic::{parse_server_command, ServerCommand};
use peril_game::routing::{PlayingState, EXCHANGE_PERIL_DIRECT, PAUSE_KEY};
use peril_game::wiring;
use peril_messaging_core::Publisher;
use peril_messaging_rabbitmq::RabbitBroker;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const HELP: &str = "\
Possible commands:
* pause
* resume
* help
* quit";

#[tokio::main]
async fn main() -> ExitCode {
    let args = ServerArgs::parse();
    init_logging(args.broker.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ServerArgs) -> anyhow::Result<()> {
    let mut interrupt = listen_for_interrupt();

    println!("Starting Peril server...");
    let connect = RabbitBroker::connect(args.broker.options());
    let broker = match until_interrupted(connect, &mut interrupt).await {
        Outcome::Finished(broker) => broker.context("connecting to RabbitMQ")?,
        Outcome::Interrupted => {
            say_interrupted();
            return Ok(());
        }
    };
    println!("Connected to RabbitMQ. Press Ctrl + C to exit.");

    let outcome = until_interrupted(serve(&broker, &args.game_log), &mut interrupt).await;
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

async fn serve(broker: &RabbitBroker, game_log: &Path) -> anyhow::Result<()> {
    let game_logs = wiring::subscribe_server(broker, game_log)
        .await
        .context("subscribing to game logs")?;
    info!(path = %game_log.display(), "writing game log");
    let mut stopped = watch_subscriptions([game_logs]);
    let publisher = broker
        .publisher()
        .await
        .context("opening publish channel")?;

    let mut lines = spawn_line_reader();
    println!("{HELP}");
    tokio::select! {
        () = repl(&mut lines, &publisher) => Ok(()),
        Some(stop) = stopped.recv() => Err(stop.into_error()),
    }
}

async fn repl<P: Publisher>(lines: &mut mpsc::Receiver<String>, publisher: &P) {
    loop {
        prompt();
        let Some(line) = lines.recv().await else {
            return;
        };
        let is_paused = match parse_server_command(&line) {
            Ok(Some(ServerCommand::Pause)) => true,
            Ok(Some(ServerCommand::Resume)) => false,
            Ok(Some(ServerCommand::Help)) => {
                println!("{HELP}");
                continue;
            }
            Ok(Some(ServerCommand::Quit)) => {
                println!("Exiting...");
                return;
            }
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let state = PlayingState { is_paused };
        match publisher
            .publish_json(EXCHANGE_PERIL_DIRECT, PAUSE_KEY, &state)
            .await
        {
            Ok(()) if is_paused => println!("Sent pause message"),
            Ok(()) => println!("Sent resume message"),
            Err(e) => warn!(error = %e, "pause state not published"),
        }
    }
}
