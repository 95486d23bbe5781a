use log::*;

use std::io::BufRead;

use super::lines::LineCursor;
use super::tokens::{count, float, tokenize};
use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::Motion;

/// Reads the frame header and rows following a `MOTION` marker into `motion`.
///
/// Rows are appended as they are read, so on error `motion` keeps every row
/// before the offending line.
pub fn parse<R: BufRead>(
    cursor: &mut LineCursor<R>,
    channels: usize,
    motion: &mut Motion,
    config: &ReaderConfig,
) -> Result<()> {
    let line = header_line(cursor, "Frames")?;
    let words = tokenize(&line);
    check_width(&words, 2, cursor.line_no(), "Frames")?;
    if words[0] != "Frames:" {
        debug!("line {}: non-standard frame count label {:?}", cursor.line_no(), words[0]);
    }
    motion.frame_count = count(words[1], cursor.line_no(), "frame count")?;

    let line = header_line(cursor, "Frame Time")?;
    let words = tokenize(&line);
    check_width(&words, 3, cursor.line_no(), "Frame Time")?;
    if words[..2] != ["Frame", "Time:"] {
        debug!("line {}: non-standard frame time label {:?}", cursor.line_no(), &words[..2]);
    }
    motion.frame_time = float(words[2], cursor.line_no(), "frame time")?;

    debug!(
        "motion: {} frame(s) of {} channel(s) at {}s",
        motion.frame_count, channels, motion.frame_time
    );

    while let Some(line) = cursor.next_line()? {
        let at = cursor.line_no();
        let words = tokenize(&line);
        if words.is_empty() {
            continue;
        }
        if words.len() != channels {
            return Err(Error::RowWidth {
                line: at,
                expected: channels,
                found: words.len(),
            });
        }
        let row = words
            .iter()
            .map(|w| float(w, at, "sample"))
            .collect::<Result<Vec<_>>>()?;
        motion.frames.push(row);
    }

    let found = motion.frames.len();
    if found != motion.frame_count {
        if config.enforce_frame_count {
            return Err(Error::FrameCountMismatch {
                declared: motion.frame_count,
                found,
            });
        }
        warn!(
            "motion declares {} frame(s) but contains {}",
            motion.frame_count, found
        );
    }
    Ok(())
}

fn header_line<R: BufRead>(cursor: &mut LineCursor<R>, header: &'static str) -> Result<String> {
    match cursor.next_line()? {
        Some(line) => Ok(line),
        None => Err(Error::MissingHeader {
            line: cursor.line_no() + 1,
            header,
        }),
    }
}

fn check_width(words: &[&str], need: usize, line: usize, header: &'static str) -> Result<()> {
    if words.len() < need {
        return Err(Error::MalformedHeader {
            line,
            header,
            need,
            found: words.len(),
        });
    }
    Ok(())
}
