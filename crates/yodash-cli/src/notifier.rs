use colored::Colorize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use yodash_core::ports::{Notice, Notifier};

/// Forwards alerts to the REPL printer task.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notice>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::warn!("[Notifier] Alert dropped, printer stopped");
        }
    }
}

pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::Warning(message) => format!("! {message}").yellow().to_string(),
        Notice::Error(message) => format!("✗ {message}").red().bold().to_string(),
    }
}

/// Prints alerts until every sender is dropped.
pub fn spawn_printer(mut rx: mpsc::UnboundedReceiver<Notice>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notice) = rx.recv().await {
            println!("{}", format_notice(&notice));
        }
    })
}
