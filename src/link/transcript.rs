use log::warn;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only text file of every line sent to the device.
#[derive(Debug, Clone)]
pub struct Transcript {
    path: PathBuf,
}

impl Transcript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `[<local time>-sent] <text>`. Failures are logged only.
    pub fn record(&self, text: &str) {
        if let Err(e) = self.append(text) {
            warn!("[transcript] Failed to write {}: {e}", self.path.display());
        }
    }

    fn append(&self, text: &str) -> std::io::Result<()> {
        let time = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut write = BufWriter::new(file);
        writeln!(write, "[{time}-sent] {}", text.trim_end())?;
        write.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = Transcript::new(dir.path().join("sent.log"));
        transcript.record("15\n");
        transcript.record("230\n");

        let data = std::fs::read_to_string(transcript.path()).unwrap();
        let lines: Vec<_> = data.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("-sent] 15"));
        assert!(lines[1].ends_with("-sent] 230"));
    }

    #[test]
    fn test_record_to_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = Transcript::new(dir.path().join("missing").join("sent.log"));
        transcript.record("15\n");
        assert!(!transcript.path().exists());
    }
}
