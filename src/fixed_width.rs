use std::io::{self, Read};

use crate::error::{EdfError, Result};

/// Size of the scratch buffer used when skipping or scanning large regions.
const SCAN_CHUNK_BYTES: usize = 8192;

/// Exact-length reads on top of any [`Read`] implementation.
///
/// A single `read` call may return fewer bytes than requested, so every
/// operation here loops until the requested count has been accumulated or the
/// stream is exhausted. Running out of bytes early is reported as
/// [`EdfError::UnexpectedEndOfFile`] carrying both the requested and the
/// obtained byte counts.
///
/// # Examples
///
/// ```rust
/// use edfcatalog::{EdfError, FixedWidthReader};
///
/// let mut reader = FixedWidthReader::new(&b"0       Alice"[..]);
/// assert_eq!(reader.read_bytes(8)?, b"0       ".to_vec());
///
/// match reader.read_bytes(80) {
///     Err(EdfError::UnexpectedEndOfFile { expected, actual }) => {
///         assert_eq!((expected, actual), (80, 5));
///     }
///     other => panic!("unexpected result: {:?}", other),
/// }
/// # Ok::<(), edfcatalog::EdfError>(())
/// ```
#[derive(Debug)]
pub struct FixedWidthReader<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> FixedWidthReader<R> {
    pub fn new(inner: R) -> Self {
        FixedWidthReader { inner, consumed: 0 }
    }

    /// Total number of bytes pulled from the underlying stream so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads exactly `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; count];
        let filled = self.fill(&mut buffer)?;
        if filled != count {
            return Err(EdfError::UnexpectedEndOfFile {
                expected: count as u64,
                actual: filled as u64,
            });
        }
        Ok(buffer)
    }

    /// Consumes exactly `count` bytes without keeping them.
    pub fn skip_bytes(&mut self, count: u64) -> Result<()> {
        self.scan_bytes(count, |_| {})
    }

    /// Consumes exactly `count` bytes, handing them to `visit` chunk by chunk.
    ///
    /// The region is streamed through a fixed-size buffer, so a huge `count`
    /// taken from a corrupt header never turns into a huge allocation.
    pub fn scan_bytes<F>(&mut self, count: u64, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8]),
    {
        let mut chunk = [0u8; SCAN_CHUNK_BYTES];
        let mut remaining = count;
        let mut total = 0u64;

        while remaining > 0 {
            let wanted = remaining.min(SCAN_CHUNK_BYTES as u64) as usize;
            let got = self.fill(&mut chunk[..wanted])?;
            visit(&chunk[..got]);
            total += got as u64;

            if got < wanted {
                return Err(EdfError::UnexpectedEndOfFile {
                    expected: count,
                    actual: total,
                });
            }
            remaining -= got as u64;
        }

        Ok(())
    }

    /// 循环读取直到缓冲区填满或者到达文件末尾
    fn fill(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut offset = 0;
        while offset < buffer.len() {
            match self.inner.read(&mut buffer[offset..]) {
                Ok(0) => break,
                Ok(n) => {
                    offset += n;
                    self.consumed += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(offset)
    }
}
