//! Exit-on-input watcher.
//!
//! Completes as soon as one line (or end of input) arrives. The caller
//! races it against the scheduler and exits the process when it wins.

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// Wait for a single line from `reader`.
///
/// An empty line and end-of-file both count as input.
pub async fn wait_for_input<R: AsyncBufRead + Unpin>(mut reader: R) -> io::Result<()> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;
    debug!(bytes = read, "Input received");
    Ok(())
}

/// Wait for the operator to press enter. Read errors also end the wait.
pub async fn wait_for_enter() {
    if let Err(e) = wait_for_input(BufReader::new(tokio::io::stdin())).await {
        debug!(error = %e, "Standard input unreadable");
    }
}
