//! Clipboard output.
//!
//! On Linux the clipboard content is served by whichever process owns the
//! selection, and it vanishes when that process exits. The copy is therefore
//! handed to a background instance of this binary, started with
//! [`OWNER_ENV`] set, which serves the text until something else is copied.

use crate::error::{
    Error,
    Result,
};

/// Set in the environment of the background clipboard owner.
pub const OWNER_ENV: &str = "GH_TOPIC_URLS_CLIPBOARD_OWNER";

/// Destination for the copied link list.
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// The operating system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

fn clipboard_error(e: impl ToString) -> Error {
    Error::ClipboardWriteFailed(e.to_string())
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn write_text(&self, text: &str) -> Result<()> {
        // fail here, not in the detached owner, when there is no display
        arboard::Clipboard::new().map_err(clipboard_error)?;
        let exe = std::env::current_exe().map_err(clipboard_error)?;
        hand_off(owner_command(&exe), text)?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn write_text(&self, text: &str) -> Result<()> {
        arboard::Clipboard::new()
            .map_err(clipboard_error)?
            .set_text(text)
            .map_err(clipboard_error)
    }
}

/// Command that starts `exe` as the background clipboard owner.
#[cfg(target_os = "linux")]
fn owner_command(exe: &std::path::Path) -> std::process::Command {
    use std::process::Stdio;

    let mut cmd = std::process::Command::new(exe);
    cmd.env(OWNER_ENV, "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .current_dir("/");
    cmd
}

/// Spawn `cmd` and write `text` to its stdin. The child is left running.
#[cfg(target_os = "linux")]
fn hand_off(mut cmd: std::process::Command, text: &str) -> Result<std::process::Child> {
    use std::io::Write;

    let mut child = cmd.spawn().map_err(clipboard_error)?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| clipboard_error("owner stdin was not captured"))?;
    stdin.write_all(text.as_bytes()).map_err(clipboard_error)?;
    Ok(child)
}

/// Serve the clipboard if this process was started as the background owner.
///
/// Reads the text from stdin and blocks until another program takes over
/// the clipboard. Returns `Ok(false)` for a normal run.
#[cfg(target_os = "linux")]
pub fn serve_if_owner() -> Result<bool> {
    use std::io::Read;

    use arboard::SetExtLinux;

    if std::env::var_os(OWNER_ENV).is_none() {
        return Ok(false);
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(clipboard_error)?;
    arboard::Clipboard::new()
        .map_err(clipboard_error)?
        .set()
        .wait()
        .text(text)
        .map_err(clipboard_error)?;
    Ok(true)
}

#[cfg(not(target_os = "linux"))]
pub fn serve_if_owner() -> Result<bool> {
    Ok(false)
}
