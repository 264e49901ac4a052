//! Markdown report rendering
//!
//! Consumes the record stream produced by `dirbench run` and renders one
//! comparison table per statistic. Scaling is applied per value; the
//! untruncated millisecond figure rides along in an HTML comment so reports
//! stay machine-diffable despite the human-friendly rounding.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::record::Variant;

/// Statistic sections rendered, in order.
const STATISTICS: [&str; 3] = ["avg", "max", "min"];

/// Scale a millisecond value to a human-appropriate unit.
///
/// Boundaries are half-open: exactly 0.001 ms renders in microseconds, and
/// exactly 1 ms and 100 ms keep the two-decimal millisecond form. Truncated
/// forms drop the fraction rather than rounding it.
pub fn scale_ms(ms: f64) -> String {
    if ms < 0.001 {
        format!("{} ns", (ms * 1_000_000.0) as i64)
    } else if ms < 1.0 {
        format!("{} μs", (ms * 1_000.0) as i64)
    } else if ms > 100.0 {
        format!("{} ms", ms as i64)
    } else {
        format!("{ms:.2} ms")
    }
}

/// One table cell: the scaled value plus the raw milliseconds in a comment.
fn cell(ms: f64) -> String {
    format!("{} <!-- {} -->", scale_ms(ms), ms)
}

/// Pull one statistic for one variant out of a parsed record.
///
/// Values may arrive as JSON numbers or as numeric strings; anything
/// missing or unparseable coerces to NaN so an incomplete record shows up
/// in the table instead of crashing the renderer.
fn stat_value(record: &Value, variant: Variant, stat: &str) -> f64 {
    match &record["stats"][variant.key()][stat] {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Render the full Markdown report for a stream of record lines.
///
/// Records are rendered in stream order, which `dirbench run` emits
/// ascending by file count. Blank lines in the stream are skipped; a line
/// that is not valid JSON is an error.
pub fn render(input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut records = Vec::new();
    for line in input.lines() {
        let line = line.context("failed to read record stream")?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Value =
            serde_json::from_str(&line).context("failed to decode record stream line")?;
        records.push(record);
    }

    writeln!(out, "# Directory listing benchmark")?;
    for stat in STATISTICS {
        writeln!(out)?;
        writeln!(out, "## {stat}")?;
        writeln!(out)?;
        writeln!(
            out,
            "| files | {} | {} | {} / {} |",
            Variant::Std.label(),
            Variant::Getdents.label(),
            Variant::Std.key(),
            Variant::Getdents.key(),
        )?;
        writeln!(out, "|---:|---:|---:|---:|")?;
        for record in &records {
            let files = record["files"].as_u64().unwrap_or(0);
            let std_ms = stat_value(record, Variant::Std, stat);
            let getdents_ms = stat_value(record, Variant::Getdents, stat);
            let ratio = std_ms / getdents_ms;
            writeln!(
                out,
                "| {files} | {} | {} | {ratio:.2} |",
                cell(std_ms),
                cell(getdents_ms),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn render_to_string(stream: &str) -> String {
        let mut out = Vec::new();
        render(Cursor::new(stream), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scale_ms_picks_nanoseconds_below_a_microsecond() {
        assert_eq!(scale_ms(0.0009), "900 ns");
        assert_eq!(scale_ms(0.0000004), "0 ns");
    }

    #[test]
    fn test_scale_ms_boundary_at_one_microsecond() {
        // exactly 0.001 ms is a microsecond, not 1000 ns
        assert_eq!(scale_ms(0.001), "1 μs");
    }

    #[test]
    fn test_scale_ms_truncates_microseconds() {
        assert_eq!(scale_ms(0.2509), "250 μs");
    }

    #[test]
    fn test_scale_ms_boundary_at_one_millisecond() {
        assert_eq!(scale_ms(1.0), "1.00 ms");
    }

    #[test]
    fn test_scale_ms_two_decimals_in_mid_range() {
        assert_eq!(scale_ms(16.381), "16.38 ms");
    }

    #[test]
    fn test_scale_ms_boundary_at_hundred_milliseconds() {
        // exactly 100 keeps the two-decimal form
        assert_eq!(scale_ms(100.0), "100.00 ms");
        assert_eq!(scale_ms(100.7), "100 ms");
    }

    #[test]
    fn test_cell_preserves_raw_value() {
        assert_eq!(cell(0.2509), "250 μs <!-- 0.2509 -->");
    }

    #[test]
    fn test_ratio_half() {
        let stream = r#"{"files":256,"stats":{"std":{"avg":2.0},"getdents":{"avg":4.0}}}"#;
        let report = render_to_string(stream);
        assert!(report.contains("| 0.50 |"), "report was: {report}");
    }

    #[test]
    fn test_zero_denominator_renders_non_finite_text() {
        let stream = r#"{"files":16,"stats":{"std":{"avg":1.0},"getdents":{"avg":0.0}}}"#;
        let report = render_to_string(stream);
        assert!(report.contains("inf"), "report was: {report}");
    }

    #[test]
    fn test_missing_statistic_renders_nan() {
        let stream = r#"{"files":16,"stats":{"std":{},"getdents":{"avg":1.0}}}"#;
        let report = render_to_string(stream);
        assert!(report.contains("NaN"), "report was: {report}");
    }

    #[test]
    fn test_numeric_string_values_are_coerced() {
        let stream = r#"{"files":16,"stats":{"std":{"avg":"2.0"},"getdents":{"avg":"4.0"}}}"#;
        let report = render_to_string(stream);
        assert!(report.contains("| 0.50 |"), "report was: {report}");
    }

    #[test]
    fn test_single_record_yields_three_sections_one_row_each() {
        let stream = concat!(
            r#"{"files":0,"stats":{"std":{"avg":1.0,"max":2.0,"min":0.5},"#,
            r#""getdents":{"avg":1.0,"max":2.0,"min":0.5}}}"#,
            "\n"
        );
        let report = render_to_string(stream);
        for stat in STATISTICS {
            assert!(report.contains(&format!("## {stat}")));
        }
        let data_rows = report.lines().filter(|l| l.starts_with("| 0 |")).count();
        assert_eq!(data_rows, 3);
    }

    #[test]
    fn test_rows_follow_stream_order() {
        let stream = concat!(
            r#"{"files":16,"stats":{"std":{"avg":1.0},"getdents":{"avg":1.0}}}"#,
            "\n",
            r#"{"files":256,"stats":{"std":{"avg":1.0},"getdents":{"avg":1.0}}}"#,
            "\n"
        );
        let report = render_to_string(stream);
        let first = report.find("| 16 |").unwrap();
        let second = report.find("| 256 |").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let stream = "\n\n";
        let report = render_to_string(stream);
        assert!(report.contains("# Directory listing benchmark"));
    }

    #[test]
    fn test_invalid_json_line_is_an_error() {
        let mut out = Vec::new();
        assert!(render(Cursor::new("not json\n"), &mut out).is_err());
    }
}
