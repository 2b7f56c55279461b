use crate::orchestrator::RunState;
use anyhow::{Context, Result};
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Download the preferred result into the current directory.
/// Returns the absolute path of the written file.
pub fn download_preferred(state: &RunState) -> Result<std::path::PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    crate::storage::export_preferred(&current_dir, state)
}

/// Initialize the clipboard manager thread if not already initialized.
/// Clipboard writes are processed sequentially, and each clipboard instance is
/// kept alive long enough for clipboard managers to read it.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if clipboard.set_text(&text).is_ok() {
                            // X11/Wayland serve the selection from this process.
                            std::thread::sleep(Duration::from_secs(2));
                        } else {
                            tracing::warn!("clipboard write failed");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Copy text to clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}
