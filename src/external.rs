//! Out-of-core merge pipeline for sources too large to load wholesale.
//!
//! Algorithm:
//! 1. Split the source into bounded chunks, each merged in memory and
//!    persisted with its width (the maximum span of its content).
//! 2. Sort the chunk index ascending by width start.
//! 3. Repeatedly combine the two entries with the smallest width starts:
//!    overlapping widths force a full re-merge of both chunks, disjoint
//!    widths allow a plain append. Either way the survivor keeps the union
//!    width and the absorbed chunk's file is removed.
//! 4. Promote the single surviving chunk to the result artifact.
//!
//! Peak memory stays proportional to the chunk size; disk carries the
//! working set.

use crate::chunk::ChunkStore;
use crate::config;
use crate::error::{MergeError, Result};
use crate::interval::span;
use crate::merge::merge;
use crate::split::split;
use std::path::{Path, PathBuf};

/// File name of the result artifact, created inside the work dir.
pub const RESULT_FILE_NAME: &str = "result.txt";

/// Out-of-core merge of an interval file.
#[derive(Debug, Clone)]
pub struct FileMergeCommand {
    /// Requested chunk byte budget (default: 1 MiB)
    pub chunk_budget: usize,
    /// Directory holding the scratch chunks and the result file
    pub work_dir: PathBuf,
}

impl Default for FileMergeCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl FileMergeCommand {
    pub fn new() -> Self {
        Self {
            chunk_budget: config::DEFAULT_CHUNK_BUDGET,
            work_dir: PathBuf::from("."),
        }
    }

    /// Set the chunk byte budget.
    pub fn with_chunk_budget(mut self, budget: usize) -> Self {
        self.chunk_budget = budget;
        self
    }

    /// Set the directory for scratch chunks and the result file.
    pub fn with_work_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Merge the file at `input` and return the path of the result
    /// artifact: the serialized merged sequence plus a trailing newline.
    pub fn run<P: AsRef<Path>>(&self, input: P) -> Result<PathBuf> {
        let window = config::effective_window(self.chunk_budget)?;
        let store = ChunkStore::open_in(&self.work_dir)?;

        match self.reduce(input.as_ref(), &store, window) {
            Ok(result) => {
                store.close();
                Ok(result)
            }
            // The store drops here and reclaims all remaining chunks.
            Err(e) => Err(e),
        }
    }

    fn reduce(&self, input: &Path, store: &ChunkStore, window: usize) -> Result<PathBuf> {
        let mut index = split(input, store, window)?;
        if index.is_empty() {
            return Err(MergeError::BadInput {
                token: String::new(),
                reason: format!("{} contains no intervals", input.display()),
            });
        }

        index.sort_by_key(|entry| entry.width.x);

        while index.len() > 1 {
            let mut second = index.remove(1);
            let first = &mut index[0];

            if first.width.merge_sorted(&second.width).is_some() {
                // Widths overlap, so the contents might: merge the union.
                let mut union = first.chunk.read_intervals()?;
                union.extend(second.chunk.read_intervals()?);
                first.chunk.overwrite(&merge(union))?;
            } else {
                // Disjoint widths guarantee every interval of the second
                // chunk lies strictly past the first; concatenation keeps
                // the sorted, non-overlapping layout intact.
                first.chunk.append_from(&mut second.chunk)?;
            }

            first.width = span(&[first.width, second.width]);
            // second drops here and its backing file is removed.
        }

        let survivor = index.pop().expect("reduction leaves one chunk");
        survivor.chunk.promote(&self.work_dir.join(RESULT_FILE_NAME))
    }
}
