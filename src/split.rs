//! Chunk splitter: partition a large interval source into bounded,
//! individually merged chunks.

use crate::chunk::{Chunk, ChunkStore};
use crate::error::{MergeError, Result};
use crate::interval::{span, Interval};
use crate::merge::merge;
use crate::text::parse_intervals;
use memchr::memrchr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// One entry of the chunk index: a persisted chunk and the maximum span of
/// its content.
#[derive(Debug)]
pub struct IndexEntry {
    pub width: Interval,
    pub chunk: Chunk,
}

/// Split the file at `path` into merged chunks of at most `window` source
/// bytes each.
///
/// The source streams through a byte window; each full window is cut after
/// the last `]` it contains, so a cut never lands inside an interval token,
/// and the tail past the cut carries over into the next window. Every cut
/// prefix is parsed, merged in memory and persisted as one chunk keyed by
/// the span of its merged content. The caller picks `window` via
/// [`crate::config::effective_window`], which keeps it large enough for any
/// single token.
///
/// The first parse or I/O failure aborts the split; chunks persisted before
/// the failure are reclaimed when the store goes out of scope.
pub fn split(path: &Path, store: &ChunkStore, window: usize) -> Result<Vec<IndexEntry>> {
    let file = File::open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);
    let mut buf: Vec<u8> = Vec::with_capacity(window);
    let mut index = Vec::new();

    loop {
        let want = window - buf.len();
        let got = (&mut reader).take(want as u64).read_to_end(&mut buf)?;
        let at_eof = got < want;

        if buf.is_empty() {
            break;
        }

        let cut = if at_eof {
            // Whatever is left is the final token run.
            buf.len()
        } else {
            match memrchr(b']', &buf) {
                Some(i) => i + 1,
                None => {
                    return Err(MergeError::BadInput {
                        token: String::from_utf8_lossy(&buf[..buf.len().min(32)]).into_owned(),
                        reason: "no interval delimiter found within the chunk byte budget".into(),
                    })
                }
            }
        };

        let intervals = parse_intervals(&buf[..cut])?;
        if !intervals.is_empty() {
            let merged = merge(intervals);
            let width = span(&merged);
            let chunk = store.create_chunk(&merged)?;
            index.push(IndexEntry { width, chunk });
        }

        buf.drain(..cut);
        if at_eof {
            break;
        }
    }

    Ok(index)
}
