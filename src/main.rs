use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pastestack::clipboard::{open_default_store, ClipboardHistory, ClipboardMonitor};
use pastestack::pasteboard;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pasteboard = match pasteboard::general() {
        Ok(pasteboard) => pasteboard,
        Err(e) => {
            error!(error = %e, "No system pasteboard available");
            std::process::exit(1);
        }
    };

    let store = open_default_store();
    let history = ClipboardHistory::new(store, Arc::clone(&pasteboard));
    history.load();
    info!(items = history.count(), "Loaded clipboard history");

    history.subscribe(|items| {
        if let Some(head) = items.first() {
            info!(items = items.len(), head = %head.preview(), "Clipboard history updated");
        } else {
            info!("Clipboard history cleared");
        }
    });

    let monitor = ClipboardMonitor::new(pasteboard, history.clone_arc());
    let handle = monitor.start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to wait for shutdown signal");
    }
    handle.stop();
    info!("Shutting down");
}
