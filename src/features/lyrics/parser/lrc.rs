//! Standard LRC format parser
//!
//! Supports the common [mm:ss.xx]text format with line-level synchronization.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::types::Cue;

/// `[mm:ss.xx]` or `[mm:ss.xxx]`
static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d{2}):(\d{2})\.(\d{2,3})\]").expect("valid timestamp regex"));

/// Convert timestamp captures into seconds
fn parse_time(caps: &Captures<'_>) -> Option<f64> {
    let min: u32 = caps.get(1)?.as_str().parse().ok()?;
    let sec: u32 = caps.get(2)?.as_str().parse().ok()?;
    let frac_str = caps.get(3)?.as_str();
    let frac: u32 = frac_str.parse().ok()?;

    // Two digits are hundredths, three are thousandths
    let scale = 10f64.powi(frac_str.len() as i32);

    Some(f64::from(min) * 60.0 + f64::from(sec) + f64::from(frac) / scale)
}

/// Parse a single LRC line
///
/// Only the first timestamp in the line is honoured; it is removed and the
/// rest of the line becomes the cue text.
fn parse_line(line: &str) -> Option<Cue> {
    let caps = TIMESTAMP.captures(line)?;
    let time = parse_time(&caps)?;
    let token = caps.get(0)?;

    let mut text = String::with_capacity(line.len() - token.len());
    text.push_str(&line[..token.start()]);
    text.push_str(&line[token.end()..]);
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    Some(Cue::new(time, text))
}

/// Parse LRC content into cues
///
/// Lines without a timestamp or without text are dropped. Cues keep the
/// order of the source file.
pub fn parse_lrc(src: &str) -> Vec<Cue> {
    src.lines().filter_map(parse_line).collect()
}

/// Largest time a two-digit minute field can hold: `[99:59.99]`
const MAX_TIMESTAMP_HUNDREDTHS: u64 = 99 * 6000 + 59 * 100 + 99;

/// Write timestamp in LRC format with hundredth precision
///
/// Times past `99:59.99` are clamped so the output always parses back.
pub fn write_timestamp(result: &mut String, time: f64) {
    use std::fmt::Write;
    let hundredths = ((time.max(0.0) * 100.0).round() as u64).min(MAX_TIMESTAMP_HUNDREDTHS);
    let frac = hundredths % 100;
    let sec = (hundredths / 100) % 60;
    let min = hundredths / 6000;
    // Writing into a String cannot fail
    let _ = write!(result, "[{:02}:{:02}.{:02}]", min, sec, frac);
}

/// Convert cues to LRC format string
pub fn stringify_lrc(cues: &[Cue]) -> String {
    let capacity: usize = cues.iter().map(|c| c.text.len() + 11).sum();
    let mut result = String::with_capacity(capacity);

    for cue in cues {
        write_timestamp(&mut result, cue.time);
        result.push_str(&cue.text);
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_parse_time_precision() {
        let line = parse_line("[00:01.12]x").unwrap();
        assert_close(line.time, 1.12);

        let line = parse_line("[00:10.254]x").unwrap();
        assert_close(line.time, 10.254);

        let line = parse_line("[01:10.05]x").unwrap();
        assert_close(line.time, 70.05);
    }

    #[test]
    fn test_parse_line() {
        let cue = parse_line("[00:01.12] test LyRiC  ").unwrap();
        assert_close(cue.time, 1.12);
        assert_eq!(cue.text, "test LyRiC");
    }

    #[test]
    fn test_rejects_malformed_timestamps() {
        assert!(parse_line("[0:01.12]short minutes").is_none());
        assert!(parse_line("[00:01.1]one fraction digit").is_none());
        assert!(parse_line("[00:01.1234]four fraction digits").is_none());
        assert!(parse_line("[00:01]no fraction").is_none());
        assert!(parse_line("no timestamp at all").is_none());
    }

    #[test]
    fn test_empty_text_dropped() {
        assert!(parse_line("[00:05.00]").is_none());
        assert!(parse_line("[00:05.00]    ").is_none());
    }

    #[test]
    fn test_only_first_timestamp_is_stripped() {
        let cue = parse_line("[00:12.50][01:30.00]Repeated line").unwrap();
        assert_close(cue.time, 12.5);
        assert_eq!(cue.text, "[01:30.00]Repeated line");
    }

    #[test]
    fn test_parse_lrc_skips_metadata() {
        let content = "[ti:Test Song]\n[ar:Test Artist]\n[00:00.00]First line\n[00:05.00]Second line\n[00:10.00]Third line";
        let cues = parse_lrc(content);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "First line");
        assert_eq!(cues[1].text, "Second line");
        assert_eq!(cues[2].text, "Third line");
    }

    #[test]
    fn test_parse_lrc_keeps_source_order() {
        let cues = parse_lrc("[00:09.00]late\n[00:01.00]early\n");
        assert_eq!(cues[0].text, "late");
        assert_eq!(cues[1].text, "early");
    }

    #[test]
    fn test_parse_lrc_handles_crlf() {
        let cues = parse_lrc("[00:01.00]a\r\n[00:02.00]b\r\n");
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "a");
        assert_eq!(cues[1].text, "b");
    }

    #[test]
    fn test_stringify_round_trip() {
        let cues = vec![
            Cue::new(0.0, "intro"),
            Cue::new(1.5, "Hello"),
            Cue::new(63.07, "World"),
            Cue::new(599.99, "outro"),
        ];
        let output = stringify_lrc(&cues);
        assert!(output.contains("[01:03.07]World"));

        let parsed = parse_lrc(&output);
        assert_eq!(parsed.len(), cues.len());
        for (a, b) in parsed.iter().zip(cues.iter()) {
            assert!((a.time - b.time).abs() < 0.005);
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn test_stringify_clamps_long_times() {
        let cues = vec![Cue::new(5999.99, "last"), Cue::new(7200.0, "too late")];
        let output = stringify_lrc(&cues);
        assert_eq!(output, "[99:59.99]last\n[99:59.99]too late\n");

        let parsed = parse_lrc(&output);
        assert_eq!(parsed.len(), 2);
        assert!((parsed[1].time - 5999.99).abs() < 0.005);
    }
}
