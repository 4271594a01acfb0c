use anyhow::Result;

#[cfg(feature = "clipboard")]
mod manager {
    use anyhow::Result;
    use std::sync::mpsc as std_mpsc;
    use std::sync::OnceLock;
    use std::time::Duration;

    // Global clipboard manager channel - initialized once on first use
    static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

    /// Background thread that owns each clipboard instance long enough for clipboard
    /// managers on Linux to read it.
    fn init_clipboard_manager() -> &'static std_mpsc::Sender<String> {
        CLIPBOARD_SENDER.get_or_init(|| {
            let (tx, rx) = std_mpsc::channel::<String>();

            std::thread::spawn(move || {
                use arboard::Clipboard;

                for text in rx {
                    match Clipboard::new() {
                        Ok(mut clipboard) => {
                            if let Err(e) = clipboard.set_text(&text) {
                                tracing::warn!(error = %e, "clipboard write failed");
                                continue;
                            }
                            std::thread::sleep(Duration::from_secs(2));
                        }
                        Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
                    }
                }
            });

            tx
        })
    }

    pub fn copy(text: &str) -> Result<()> {
        init_clipboard_manager()
            .send(text.to_string())
            .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))
    }
}

/// Queue `text` for the clipboard without blocking the UI thread.
#[cfg(feature = "clipboard")]
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    manager::copy(text)
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_to_clipboard(_text: &str) -> Result<()> {
    Err(anyhow::anyhow!("built without clipboard support"))
}
