//! Validate site content

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::config::CONFIG_FILE;
use crate::validate::Report;
use crate::Folio;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Check the site and print the report. Returns whether the check passed.
pub fn run(folio: &Folio, format: Format, deny_warnings: bool) -> Result<bool> {
    let report = folio.check()?;
    print!("{}", render(&report, format)?);
    Ok(report.passed(deny_warnings))
}

/// Render a report in the requested format
pub fn render(report: &Report, format: Format) -> Result<String> {
    let out = match format {
        Format::Json => serde_json::to_string_pretty(report)? + "\n",
        Format::Text => {
            let mut out = String::new();
            for issue in &report.issues {
                out.push_str(&issue.to_string());
                out.push('\n');
            }
            out.push_str(&format!(
                "Checked {} documents: {} errors, {} warnings\n",
                report.checked,
                report.error_count(),
                report.warning_count()
            ));
            out
        }
    };
    Ok(out)
}

/// Watch the content directories and re-check on every change
pub async fn watch(folio: &Folio, format: Format, deny_warnings: bool) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&folio.posts_dir, &folio.pages_dir] {
        if dir.exists() {
            watcher.watch(dir, notify::RecursiveMode::Recursive)?;
        }
    }

    let config_path = folio.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_check = std::time::Instant::now();
    let mut folio = folio.clone();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_check.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, checking...");
                    match Folio::new(&folio.base_dir) {
                        Ok(reloaded) => folio = reloaded,
                        Err(e) => tracing::error!("Failed to reload {}: {:#}", CONFIG_FILE, e),
                    }
                    if let Err(e) = run(&folio, format, deny_warnings) {
                        tracing::error!("Check failed: {:#}", e);
                    }
                    last_check = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Issue, Severity};

    fn report() -> Report {
        Report {
            checked: 2,
            issues: vec![Issue {
                source: "content/md/posts/2016-02-13-schemas.md".to_string(),
                severity: Severity::Error,
                rule: "tags",
                message: "missing required key :tags".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_text() {
        let out = render(&report(), Format::Text).unwrap();
        assert_eq!(
            out,
            "error[tags] content/md/posts/2016-02-13-schemas.md: missing required key :tags\n\
             Checked 2 documents: 1 errors, 0 warnings\n"
        );
    }

    #[test]
    fn test_render_json() {
        let out = render(&report(), Format::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["checked"], 2);
        assert_eq!(json["issues"][0]["severity"], "error");
        assert_eq!(json["issues"][0]["rule"], "tags");
    }

    #[test]
    fn test_run_on_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(run(&folio, Format::Text, true).unwrap());
    }
}
