//! Narration text to timed display segments.
//!
//! Splitting tries progressively finer boundaries until at least [`MIN_SEGMENTS`] pieces
//! exist: blank-line paragraphs, then long single lines, then grouped sentences. Durations are
//! proportional to word share and always sum to the narration duration.

use crate::foundation::error::{ReelError, ReelResult};

/// Splitting stops at the first strategy yielding at least this many segments.
pub const MIN_SEGMENTS: usize = 3;
/// Single-newline pieces must be longer than this (in chars) to count as a segment.
pub const MIN_LINE_CHARS: usize = 20;
/// A sentence group is flushed once it reaches this many words...
pub const GROUP_MAX_WORDS: usize = 30;
/// ...or this many sentences.
pub const GROUP_MAX_SENTENCES: usize = 3;
/// Remainders larger than this indicate an upstream inconsistency and are logged.
pub const DRIFT_TOLERANCE_SECS: f64 = 0.1;

/// One narration chunk mapped to one timed caption/background unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub text: String,
    pub word_count: usize,
    pub duration: f64,
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split narration into ordered display segments. Never returns an empty list.
pub fn split_script(text: &str) -> Vec<String> {
    let mut segments = split_paragraphs(text);

    if segments.len() < MIN_SEGMENTS {
        segments = split_long_lines(text);
    }

    if segments.len() < MIN_SEGMENTS {
        segments = group_sentences(&split_sentences(text));
    }

    if segments.is_empty() {
        segments.push(text.to_string());
    }
    segments
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = Vec::<&str>::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut out);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut out);
    out
}

fn flush_paragraph(current: &mut Vec<&str>, out: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let joined = current.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

fn split_long_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| l.chars().count() > MIN_LINE_CHARS)
        .map(str::to_string)
        .collect()
}

/// Sentence boundaries sit after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(end, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }
        out.push(&text[start..end]);
        while let Some(&(_, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            chars.next();
        }
        start = chars.peek().map(|&(i, _)| i).unwrap_or(text.len());
    }
    if start < text.len() {
        out.push(&text[start..]);
    }

    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn group_sentences(sentences: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    let mut group = Vec::<&str>::new();
    let mut words = 0usize;

    for &sentence in sentences {
        group.push(sentence);
        words += word_count(sentence);
        if words >= GROUP_MAX_WORDS || group.len() >= GROUP_MAX_SENTENCES {
            out.push(group.join(" "));
            group.clear();
            words = 0;
        }
    }
    if !group.is_empty() {
        out.push(group.join(" "));
    }
    out
}

/// Distribute `audio_duration` over segments proportionally to their word counts.
///
/// Zero total words distributes equally. The last segment absorbs the floating-point remainder,
/// so the result sums to `audio_duration`.
pub fn allocate_durations(word_counts: &[usize], audio_duration: f64) -> ReelResult<Vec<f64>> {
    if !audio_duration.is_finite() || audio_duration <= 0.0 {
        return Err(ReelError::validation(
            "audio duration must be finite and > 0",
        ));
    }
    if word_counts.is_empty() {
        return Err(ReelError::validation(
            "cannot allocate durations for zero segments",
        ));
    }

    let n = word_counts.len();
    let total: usize = word_counts.iter().sum();
    let mut durations: Vec<f64> = word_counts
        .iter()
        .map(|&w| {
            let share = if total > 0 {
                w as f64 / total as f64
            } else {
                1.0 / n as f64
            };
            audio_duration * share
        })
        .collect();

    let drift = audio_duration - durations.iter().sum::<f64>();
    if drift.abs() > DRIFT_TOLERANCE_SECS {
        tracing::warn!(drift, "segment durations drifted from narration duration");
    }
    let prefix: f64 = durations[..n - 1].iter().sum();
    durations[n - 1] = (audio_duration - prefix).max(0.0);

    Ok(durations)
}

/// Split `text` and time each piece against `audio_duration`.
#[tracing::instrument(skip(text), fields(chars = text.len()))]
pub fn allocate_segments(text: &str, audio_duration: f64) -> ReelResult<Vec<Segment>> {
    let pieces = split_script(text);
    let counts: Vec<usize> = pieces.iter().map(|p| word_count(p)).collect();
    let durations = allocate_durations(&counts, audio_duration)?;

    let segments: Vec<Segment> = pieces
        .into_iter()
        .zip(counts)
        .zip(durations)
        .map(|((text, word_count), duration)| Segment {
            text,
            word_count,
            duration,
        })
        .collect();
    tracing::debug!(segments = segments.len(), "allocated narration segments");
    Ok(segments)
}

#[cfg(test)]
#[path = "../../tests/unit/script/segment.rs"]
mod tests;
