//! Best-effort text file output of generated speech.
//!
//! Each reply overwrites `<save data>/ColonistPrompts/<Name>_say.txt` so
//! external tools (TTS, stream overlays) can pick up the latest line.

use std::path::{Path, PathBuf};

/// Directory under the save-data folder holding the speech files.
pub const SPEECH_DIR: &str = "ColonistPrompts";

#[derive(Debug, Clone)]
pub struct SpeechFileWriter {
    save_data_dir: PathBuf,
}

impl SpeechFileWriter {
    pub fn new(save_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_data_dir: save_data_dir.into(),
        }
    }

    /// Path the speech of `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.save_data_dir
            .join(SPEECH_DIR)
            .join(format!("{}_say.txt", file_stem(name)))
    }

    /// Write `text` for `name`. Failures are logged and swallowed.
    pub async fn write(&self, name: &str, text: &str) {
        let path = self.path_for(name);
        if let Err(e) = write_file(&path, text).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to write speech file");
        }
    }
}

async fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, text).await
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "Unnamed".to_string()
    } else {
        stem
    }
}
