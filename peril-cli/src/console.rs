//! Line input, interrupt handling and subscription watching shared by
//! both binaries.

use std::future::Future;
use std::io::{BufRead, Write};

use anyhow::anyhow;
use peril_messaging_core::MessagingError;
use peril_messaging_rabbitmq::Subscription;
use tokio::sync::{mpsc, watch};
use tracing::{error, warn};

/// Reads stdin on a dedicated thread so a pending read never holds up
/// shutdown. The receiver closes on EOF.
pub fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Prompts until a non-blank line arrives; `None` on EOF.
pub async fn read_word(lines: &mut mpsc::Receiver<String>, question: &str) -> Option<String> {
    loop {
        println!("{question}");
        prompt();
        let line = lines.recv().await?;
        if let Some(word) = line.split_whitespace().next() {
            return Some(word.to_string());
        }
    }
}

/// Starts listening for Ctrl+C right away. The receiver flips to `true`
/// on the first interrupt; it closes without flipping if signals are
/// unavailable.
pub fn listen_for_interrupt() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => warn!(error = %e, "cannot listen for interrupts"),
        }
    });
    rx
}

#[derive(Debug)]
pub enum Outcome<T> {
    Finished(T),
    Interrupted,
}

/// Runs `work` until it completes or `interrupt` turns `true`.
pub async fn until_interrupted<F: Future>(
    work: F,
    interrupt: &mut watch::Receiver<bool>,
) -> Outcome<F::Output> {
    tokio::select! {
        output = work => Outcome::Finished(output),
        Ok(_) = interrupt.wait_for(|&hit| hit) => Outcome::Interrupted,
    }
}

/// A dispatch loop that ended, and how.
#[derive(Debug)]
pub struct Stopped {
    pub queue: String,
    pub result: Result<u64, MessagingError>,
}

impl Stopped {
    pub fn into_error(self) -> anyhow::Error {
        let queue = self.queue;
        match self.result {
            Ok(settled) => anyhow!("consumer on {queue} stopped after {settled} deliveries"),
            Err(e) => {
                let context = format!("consumer on {queue} failed");
                anyhow::Error::new(e).context(context)
            }
        }
    }
}

/// Reports each subscription whose dispatch loop ends. A loop only ends
/// when its consumer is cancelled or the connection drops.
pub fn watch_subscriptions(
    subscriptions: impl IntoIterator<Item = Subscription>,
) -> mpsc::Receiver<Stopped> {
    let (tx, rx) = mpsc::channel(4);
    for sub in subscriptions {
        let tx = tx.clone();
        tokio::spawn(async move {
            let queue = sub.queue().to_string();
            let result = sub.join().await;
            if let Err(e) = &result {
                error!(%queue, error = %e, "dispatch loop failed");
            }
            let _ = tx.send(Stopped { queue, result }).await;
        });
    }
    rx
}
