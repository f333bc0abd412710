//! Decoders for the general header and the per-signal header blocks.
//!
//! Both decoders consume the stream strictly in file order; the signal header
//! decoder expects the cursor to sit right after the 256-byte general header.

use std::io::Read;

use log::debug;

use crate::error::Result;
use crate::fixed_width::FixedWidthReader;
use crate::types::{Channel, GeneralHeader, SignalHeader};
use crate::utils::{ascii_field, format_date, parse_count, parse_seconds};
use crate::{ANNOTATION_CHANNEL_LABEL, HEADER_GENERAL_BYTES};

// 主头部字段 (offset, length)
const GH_VERSION: (usize, usize) = (0, 8);
const GH_PATIENT_INFO: (usize, usize) = (8, 80);
const GH_START_DATE: (usize, usize) = (168, 8);
const GH_START_TIME: (usize, usize) = (176, 8);
const GH_NUM_DATA_RECORDS: (usize, usize) = (236, 8);
const GH_RECORD_DURATION: (usize, usize) = (244, 8);
const GH_NUM_SIGNALS: (usize, usize) = (252, 4);

// 信号头部字段宽度（每个信号）
const SH_LABEL_LEN: usize = 16;
const SH_TRANSDUCER_LEN: usize = 80;
const SH_PHYSICAL_DIMENSION_LEN: usize = 8;
const SH_PHYSICAL_MIN_LEN: usize = 8;
const SH_PHYSICAL_MAX_LEN: usize = 8;
const SH_DIGITAL_MIN_LEN: usize = 8;
const SH_DIGITAL_MAX_LEN: usize = 8;
const SH_PREFILTER_LEN: usize = 80;
const SH_SAMPLES_PER_RECORD_LEN: usize = 8;
const SH_RESERVED_LEN: usize = 32;

fn field(header: &[u8], (offset, len): (usize, usize)) -> String {
    ascii_field(header, offset, len)
}

/// Reads and decodes the 256-byte general header.
///
/// # Errors
///
/// * `EdfError::UnexpectedEndOfFile` - fewer than 256 bytes are available
/// * `EdfError::MalformedField` - a numeric field does not hold a non-negative number
/// * `EdfError::InvalidTimestamp` - the start date/time is not a real timestamp
///
/// # Examples
///
/// ```rust
/// use edfcatalog::{read_general_header, FixedWidthReader};
/// use edfcatalog::doctest_utils::{EdfImage, ImageSignal};
///
/// let image = EdfImage::new()
///     .patient("Alice")
///     .start("01.09.25", "10.00.00")
///     .record_duration("2")
///     .signal(ImageSignal::new("Fp1", "AgAgCl", 4))
///     .empty_records(5)
///     .to_bytes();
///
/// let mut reader = FixedWidthReader::new(&image[..]);
/// let header = read_general_header(&mut reader)?;
///
/// assert_eq!(header.patient_name, "Alice");
/// assert_eq!(header.num_signals, 1);
/// assert_eq!(header.recording_length_seconds(), 10.0);
/// # Ok::<(), edfcatalog::EdfError>(())
/// ```
pub fn read_general_header<R: Read>(reader: &mut FixedWidthReader<R>) -> Result<GeneralHeader> {
    let header = reader.read_bytes(HEADER_GENERAL_BYTES)?;

    let recording_start = format_date(
        &field(&header, GH_START_DATE),
        &field(&header, GH_START_TIME),
    )?;

    let general = GeneralHeader {
        identifier: field(&header, GH_VERSION),
        patient_name: field(&header, GH_PATIENT_INFO),
        recording_start,
        num_data_records: parse_count("numDataRecords", &field(&header, GH_NUM_DATA_RECORDS))?,
        record_duration_seconds: parse_seconds(
            "recordDurationSeconds",
            &field(&header, GH_RECORD_DURATION),
        )?,
        num_signals: parse_count("numSignals", &field(&header, GH_NUM_SIGNALS))?,
    };

    debug!(
        "general header: {} records of {}s, {} signals",
        general.num_data_records, general.record_duration_seconds, general.num_signals
    );

    Ok(general)
}

/// Reads the per-signal header blocks for `num_signals` signals.
///
/// Physical dimension, physical/digital ranges, prefilter and the reserved
/// area are consumed only to keep the stream position right; their content is
/// not kept. The returned header has `annotation_count == 0`, the annotation
/// scanner fills it in.
///
/// Every label equal to `EDF Annotations` is excluded from the data channels.
/// If more than one signal carries it, the last one is the annotation channel.
pub fn read_signal_header<R: Read>(
    reader: &mut FixedWidthReader<R>,
    num_signals: usize,
) -> Result<SignalHeader> {
    let labels = read_signal_field(reader, num_signals, SH_LABEL_LEN)?;
    let transducer_types = read_signal_field(reader, num_signals, SH_TRANSDUCER_LEN)?;

    // 以下字段只需要跳过
    for len in [
        SH_PHYSICAL_DIMENSION_LEN,
        SH_PHYSICAL_MIN_LEN,
        SH_PHYSICAL_MAX_LEN,
        SH_DIGITAL_MIN_LEN,
        SH_DIGITAL_MAX_LEN,
        SH_PREFILTER_LEN,
    ] {
        reader.skip_bytes((num_signals * len) as u64)?;
    }

    let samples_per_record = read_signal_field(reader, num_signals, SH_SAMPLES_PER_RECORD_LEN)?
        .iter()
        .map(|raw| parse_count("samplesPerRecord", raw))
        .collect::<Result<Vec<_>>>()?;

    reader.skip_bytes((num_signals * SH_RESERVED_LEN) as u64)?;

    let mut annotation_channel_index = None;
    let mut data_channels = Vec::with_capacity(num_signals);

    for (i, (label, transducer)) in labels.iter().zip(&transducer_types).enumerate() {
        if label == ANNOTATION_CHANNEL_LABEL {
            annotation_channel_index = Some(i);
        } else {
            data_channels.push(Channel::new(label.as_str(), transducer.as_str()));
        }
    }

    debug!(
        "signal header: {} data channels, annotation channel {:?}",
        data_channels.len(),
        annotation_channel_index
    );

    Ok(SignalHeader {
        labels,
        transducer_types,
        samples_per_record,
        annotation_channel_index,
        data_channels,
        annotation_count: 0,
    })
}

/// Reads one `num_signals × width` block and splits it into trimmed values.
fn read_signal_field<R: Read>(
    reader: &mut FixedWidthReader<R>,
    num_signals: usize,
    width: usize,
) -> Result<Vec<String>> {
    let block = reader.read_bytes(num_signals * width)?;
    Ok((0..num_signals)
        .map(|i| ascii_field(&block, i * width, width))
        .collect())
}
