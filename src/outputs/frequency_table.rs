//! The plain-text frequency table.
//!
//! One line per entry, `"{token}: {count}"`, in ranking order:
//!
//! ```text
//! 川普: 42
//! 烏克蘭: 37
//! 俄羅斯: 37
//! ```

use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Render entries as table text, one `"{token}: {count}\n"` line each.
pub fn format_table(entries: &[(String, usize)]) -> String {
    let mut out = String::new();
    for (token, count) in entries {
        let _ = writeln!(out, "{token}: {count}");
    }
    out
}

/// Parse table text back into `(token, count)` pairs, preserving order.
///
/// Splits on the last `": "` of each line. Blank lines are skipped.
#[cfg(test)]
pub fn parse_table(raw: &str) -> Result<Vec<(String, usize)>, String> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let (token, count) = line
                .rsplit_once(": ")
                .ok_or_else(|| format!("line {}: missing \": \" separator in {line:?}", i + 1))?;
            let count = count
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("line {}: bad count {count:?}: {e}", i + 1))?;
            Ok((token.to_string(), count))
        })
        .collect()
}

/// Write the table to `path`, replacing any existing file.
#[instrument(level = "info", skip(entries), fields(path = %path.display(), entries = entries.len()))]
pub async fn write_frequency_table(
    entries: &[(String, usize)],
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    fs::write(path, format_table(entries)).await?;
    info!("Wrote word frequency table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(v: &[(&str, usize)]) -> Vec<(String, usize)> {
        v.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&pairs(&[("中國", 2), ("台灣", 1)]));
        assert_eq!(table, "中國: 2\n台灣: 1\n");
    }

    #[test]
    fn test_format_empty_table() {
        assert_eq!(format_table(&[]), "");
        assert!(parse_table("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_parse_recovers_pairs_and_order() {
        let entries = pairs(&[("川普", 42), ("烏克蘭", 37), ("俄羅斯", 37), ("G7", 1)]);
        let path = std::env::temp_dir().join(format!("ltn_freq_{}.txt", std::process::id()));

        write_frequency_table(&entries, &path).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(parse_table(&raw).unwrap(), entries);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        let err = parse_table("中國: 2\n台灣 1\n").unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");

        let err = parse_table("中國: two\n").unwrap_err();
        assert!(err.starts_with("line 1:"), "{err}");
    }
}
