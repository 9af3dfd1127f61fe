//! Lyrics conversion.
//!
//! Timed lyrics arrive as one string with `＃` (U+FF03) between lines and
//! `|` between a line's start time in seconds and its text:
//!
//! ```text
//! 12.5|Hello＃13.0|World
//! ```
//!
//! They are rendered twice: as LRC-style synced lyrics and as plain text for
//! embedding.

use std::fmt::Write;

use crate::{
    error::{Error, Result},
    host::LyricsInfo,
    protocol::lyrics::Lyrics,
};

/// Line separator of timed lyrics.
pub const LINE_SEPARATOR: char = '＃';

/// Separator between the timestamp and the text of a line.
pub const TIME_SEPARATOR: char = '|';

/// One line of timed lyrics.
#[derive(Clone, Debug, PartialEq)]
pub struct Line<'a> {
    /// Start of the line in seconds.
    pub seconds: f64,
    pub text: &'a str,
}

/// Splits timed lyrics into lines.
///
/// Empty lines are skipped; so are lines without a timestamp, which the
/// vendor sometimes uses for credits.
///
/// # Errors
///
/// Returns a data loss error if a timestamp is not a non-negative number.
pub fn parse(timed: &str) -> Result<Vec<Line<'_>>> {
    let mut lines = Vec::new();
    for line in timed.split(LINE_SEPARATOR).flat_map(str::lines) {
        if line.trim().is_empty() {
            continue;
        }

        let Some((time, text)) = line.split_once(TIME_SEPARATOR) else {
            debug!("skipping lyrics line without timestamp");
            continue;
        };

        let seconds = time.trim().parse::<f64>()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(Error::data_loss(format!("invalid lyrics timestamp \"{time}\"")));
        }

        lines.push(Line { seconds, text });
    }

    Ok(lines)
}

/// Formats seconds as `MM:SS.cc`.
///
/// Centiseconds are truncated, not rounded. Minutes keep counting past 59.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn timestamp(seconds: f64) -> String {
    let micros = (seconds * 1_000_000.0).round() as u64;
    let centis = micros / 10_000;
    format!(
        "{:02}:{:02}.{:02}",
        centis / 6_000,
        centis / 100 % 60,
        centis % 100
    )
}

/// Renders `[MM:SS.cc]text` lines.
#[must_use]
pub fn synced(lines: &[Line<'_>]) -> String {
    let mut lrc = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            lrc.push('\n');
        }
        // Writing into a `String` cannot fail.
        let _ = write!(lrc, "[{}]{}", timestamp(line.seconds), line.text);
    }
    lrc
}

/// Renders the text of each line, without timestamps.
#[must_use]
pub fn embedded(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts vendor lyrics into the host's lyrics record.
///
/// # Errors
///
/// Returns error if the timed lyrics cannot be parsed.
pub fn convert(lyrics: Option<&Lyrics>) -> Result<LyricsInfo> {
    let Some(lyrics) = lyrics else {
        return Ok(LyricsInfo::default());
    };

    if let Some(timed) = lyrics.time.as_deref() {
        let lines = parse(timed)?;
        return Ok(LyricsInfo {
            embedded: Some(embedded(&lines)),
            synced: Some(synced(&lines)),
        });
    }

    Ok(LyricsInfo {
        embedded: lyrics.normal.clone(),
        synced: None,
    })
}
