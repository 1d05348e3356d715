//! A writer shared by concurrent workers.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

/// Serializes writes from many workers onto one underlying writer.
///
/// Each call to [`LockedWriter::write_block`] is written and flushed while
/// holding the lock, so blocks never interleave.
pub struct LockedWriter {
    inner: Mutex<Box<dyn Write + Send>>,
}

impl LockedWriter {
    /// Wraps a writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Mutex::new(Box::new(writer)),
        }
    }

    /// Wraps the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes a whole block atomically with respect to other writers.
    pub fn write_block(&self, block: &str) -> io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(block.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Debug for LockedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedWriter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SharedBuffer;
    use std::sync::Arc;

    #[test]
    fn test_blocks_do_not_interleave() {
        let buffer = SharedBuffer::new();
        let writer = Arc::new(LockedWriter::new(buffer.clone()));

        let threads: Vec<_> = (0..8)
            .map(|i| {
                let writer = writer.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let block = format!("worker {i} start\n\tworker {i} end\n");
                        writer.write_block(&block).unwrap();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        let text = buffer.contents();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8 * 50 * 2);
        for pair in lines.chunks(2) {
            let worker = pair[0].trim_end_matches(" start");
            assert_eq!(pair[1], format!("\t{worker} end"));
        }
    }
}
