//! Parser and serializer for the textual interval-list notation.
//!
//! A list is written as `[x,y]` tokens separated by any amount of
//! whitespace, including none; whitespace is also permitted around the
//! brackets, the comma and the numbers.

use crate::error::{MergeError, Result};
use crate::interval::Interval;
use memchr::memchr;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Parse every interval token in `data`.
///
/// Tokens are delimited by the closing bracket. A token missing the comma,
/// or with an empty or non-numeric endpoint, aborts parsing immediately;
/// nothing parsed so far is returned. Trailing whitespace after the final
/// token is accepted.
pub fn parse_intervals(data: &[u8]) -> Result<Vec<Interval>> {
    let mut res = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        match memchr(b']', &data[pos..]) {
            Some(off) => {
                res.push(parse_token(&data[pos..pos + off + 1])?);
                pos += off + 1;
            }
            None => {
                // No delimiter left; anything but whitespace is one last
                // (bracketless) token.
                let rest = &data[pos..];
                if !rest.iter().all(|b| b.is_ascii_whitespace()) {
                    res.push(parse_token(rest)?);
                }
                break;
            }
        }
    }

    Ok(res)
}

fn parse_token(token: &[u8]) -> Result<Interval> {
    let comma =
        memchr(b',', token).ok_or_else(|| bad_token(token, "missing ',' separator".into()))?;
    let x = parse_endpoint(&token[..comma], token)?;
    let y = parse_endpoint(&token[comma + 1..], token)?;
    Ok(Interval::new(x, y))
}

fn parse_endpoint(raw: &[u8], token: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| bad_token(token, "endpoint is not valid UTF-8".into()))?;
    let trimmed = text.trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace());
    trimmed
        .parse()
        .map_err(|_| bad_token(token, format!("endpoint {:?} is not a number", trimmed)))
}

fn bad_token(token: &[u8], reason: String) -> MergeError {
    MergeError::BadInput {
        token: String::from_utf8_lossy(token).into_owned(),
        reason,
    }
}

/// Serialize a sequence as space-joined `[x,y]` tokens, no trailing
/// separator. An empty sequence writes nothing; callers that need a visible
/// rendering for "no intervals" handle that themselves.
pub fn write_intervals<W: Write>(writer: &mut W, intervals: &[Interval]) -> io::Result<()> {
    let mut itoa_buf = itoa::Buffer::new();
    for (i, interval) in intervals.iter().enumerate() {
        if i > 0 {
            writer.write_all(b" ")?;
        }
        writer.write_all(b"[")?;
        writer.write_all(itoa_buf.format(interval.x).as_bytes())?;
        writer.write_all(b",")?;
        writer.write_all(itoa_buf.format(interval.y).as_bytes())?;
        writer.write_all(b"]")?;
    }
    Ok(())
}

/// Serialize into an owned string.
pub fn intervals_to_string(intervals: &[Interval]) -> String {
    let mut out = String::with_capacity(intervals.len() * 12);
    for (i, interval) in intervals.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", interval);
    }
    out
}
