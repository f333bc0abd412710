//! Annotation counting over the data-record region.
//!
//! The EDF+ annotation channel carries Time-stamped Annotation Lists (TALs)
//! whose entries are terminated by NUL bytes. Instead of parsing the TAL
//! grammar, the scanner counts every NUL inside the annotation channel's byte
//! window of each data record. Because onset/duration separators and padding
//! are NULs too, the result is an upper-bound style approximation of the
//! number of annotations, not an exact count.

use std::io::Read;

use log::debug;

use crate::error::Result;
use crate::fixed_width::FixedWidthReader;
use crate::{BYTES_PER_SAMPLE, TAL_DELIMITER};

/// Counts TAL delimiters in the annotation channel across all data records.
///
/// The stream must be positioned at the first data record. With no
/// annotation channel (or an index outside `samples_per_record`) the count is
/// 0 and nothing is read.
///
/// For every record the scanner skips the samples of the signals before the
/// annotation channel, counts NULs in the annotation channel's
/// `samples_per_record[index] × 2` bytes, then skips the remaining signals.
/// A truncated record fails with `EdfError::UnexpectedEndOfFile`.
///
/// # Examples
///
/// ```rust
/// use edfcatalog::{count_annotations, FixedWidthReader};
///
/// // samples per record [1, 2]; the annotation channel is signal 1
/// let records: Vec<u8> = [
///     [9u8, 9, b'+', b'0', 0x14, 0x00],
///     [9u8, 9, b'+', b'1', 0x00, 0x00],
/// ]
/// .concat();
///
/// let mut reader = FixedWidthReader::new(&records[..]);
/// assert_eq!(count_annotations(&mut reader, 2, &[1, 2], Some(1))?, 3);
/// # Ok::<(), edfcatalog::EdfError>(())
/// ```
pub fn count_annotations<R: Read>(
    reader: &mut FixedWidthReader<R>,
    num_data_records: usize,
    samples_per_record: &[usize],
    annotation_channel_index: Option<usize>,
) -> Result<u64> {
    let Some(index) = annotation_channel_index.filter(|&i| i < samples_per_record.len()) else {
        return Ok(0);
    };

    let bytes_of = |samples: &[usize]| -> u64 {
        samples.iter().map(|&s| s as u64 * BYTES_PER_SAMPLE).sum()
    };

    let before = bytes_of(&samples_per_record[..index]);
    let window = bytes_of(&samples_per_record[index..=index]);
    let after = bytes_of(&samples_per_record[index + 1..]);

    debug!(
        "scanning {} records: skip {} bytes, annotation window {} bytes, skip {} bytes",
        num_data_records, before, window, after
    );

    let mut count = 0u64;
    for _ in 0..num_data_records {
        reader.skip_bytes(before)?;
        reader.scan_bytes(window, |chunk| {
            count += chunk.iter().filter(|&&b| b == TAL_DELIMITER).count() as u64;
        })?;
        reader.skip_bytes(after)?;
    }

    Ok(count)
}
