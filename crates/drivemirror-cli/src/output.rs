//! Output formatting for CLI commands
//!
//! Commands report through an [`OutputFormatter`]. The human formatter
//! writes status lines and per-transfer lines for people; the JSON formatter
//! keeps stdout to a single document per command and sends status lines to
//! stderr as one JSON object per line.

use drivemirror_core::domain::{TransferOutcome, TransferRecord, TransferSource};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    /// Detail line; dropped in JSON mode
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
    /// One download or upload that did not succeed
    fn transfer(&self, record: &TransferRecord);
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {message}");
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {message}");
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {message}");
    }
    fn info(&self, message: &str) {
        println!("  {message}");
    }
    fn print_json(&self, _value: &serde_json::Value) {}
    fn transfer(&self, record: &TransferRecord) {
        let line = describe_transfer(record);
        match record.outcome {
            TransferOutcome::Failed => self.error(&line),
            TransferOutcome::Skipped => self.info(&format!("skipped {line}")),
            TransferOutcome::Success => self.info(&line),
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl JsonFormatter {
    fn status(level: &str, message: &str) {
        eprintln!("{}", serde_json::json!({"level": level, "message": message}));
    }
}

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        Self::status("success", message);
    }
    fn error(&self, message: &str) {
        Self::status("error", message);
    }
    fn warn(&self, message: &str) {
        Self::status("warning", message);
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
    // Records are already part of the command's JSON document.
    fn transfer(&self, _record: &TransferRecord) {}
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}

/// "1 file" / "3 files"
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// `source -> destination (reason)`
pub fn describe_transfer(record: &TransferRecord) -> String {
    let source = match &record.source {
        TransferSource::Remote(id) => id.to_string(),
        TransferSource::Local(path) => path.display().to_string(),
    };
    match &record.reason {
        Some(reason) => format!("{source} -> {} ({reason})", record.destination),
        None => format!("{source} -> {}", record.destination),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use drivemirror_core::domain::RemoteId;

    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file"), "1 file");
        assert_eq!(plural(0, "file"), "0 files");
        assert_eq!(plural(12, "error"), "12 errors");
    }

    #[test]
    fn test_describe_download_failure() {
        let id = RemoteId::new("1xYz".into()).unwrap();
        let record = TransferRecord::failed(&id, Path::new("/m/a.jpg"), "timed out");
        assert_eq!(describe_transfer(&record), "1xYz -> /m/a.jpg (timed out)");
    }

    #[test]
    fn test_describe_upload() {
        let id = RemoteId::new("file-7".into()).unwrap();
        let record = TransferRecord::uploaded(Path::new("runs/best.pt"), &id);
        assert_eq!(describe_transfer(&record), "runs/best.pt -> file-7");
    }
}
