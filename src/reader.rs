use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::annotations::count_annotations;
use crate::error::{EdfError, Result};
use crate::fixed_width::FixedWidthReader;
use crate::header::{read_general_header, read_signal_header};
use crate::types::{FileRecord, ValidRecord};
use crate::IDENTIFIER_VERSION_CHAR;

/// Decodes one EDF stream into a [`FileRecord`].
///
/// The stream is read strictly forward: general header, identifier check,
/// signal header, then the data records of the annotation channel. Any
/// failure along the way produces [`FileRecord::Invalid`]; the reason is
/// logged at `warn` level and otherwise dropped. Use
/// [`parse_stream_detailed`] to get the error itself.
///
/// A file whose identifier is empty or does not start with `0` is abandoned
/// right after the 256-byte general header.
///
/// # Examples
///
/// ```rust
/// use edfcatalog::{parse_stream, Channel, FileRecord};
/// use edfcatalog::doctest_utils::annotated_image;
///
/// let bytes = annotated_image().to_bytes();
///
/// match parse_stream("session.edf", &bytes[..]) {
///     FileRecord::Valid(record) => {
///         assert_eq!(record.identifier, "0IDENT");
///         assert_eq!(record.patient_name, "Alice");
///         assert_eq!(record.data_channels, vec![
///             Channel::new("Fp1", "T1"),
///             Channel::new("Fp2", "T2"),
///         ]);
///         assert_eq!(record.recording_length_seconds, 10.0);
///         assert_eq!(record.annotation_count, 3);
///     }
///     FileRecord::Invalid { file_name } => panic!("{} rejected", file_name),
/// }
///
/// // Anything malformed collapses into an invalid record
/// let record = parse_stream("short.edf", &bytes[..100]);
/// assert_eq!(record, FileRecord::invalid("short.edf"));
/// ```
pub fn parse_stream<R: Read>(file_name: &str, reader: R) -> FileRecord {
    match parse_stream_detailed(file_name, reader) {
        Ok(record) => record.into(),
        Err(e) => {
            warn!("{} is not a valid EDF file: {}", file_name, e);
            FileRecord::invalid(file_name)
        }
    }
}

/// Same as [`parse_stream`] but returns the decode error instead of an
/// invalid record.
///
/// # Errors
///
/// * `EdfError::UnexpectedEndOfFile` - the stream ends inside a header or a data record
/// * `EdfError::MalformedField` - a numeric header field cannot be parsed
/// * `EdfError::InvalidTimestamp` - the start date/time is not a real timestamp
/// * `EdfError::InvalidIdentifier` - the identifier is empty or does not start with `0`
/// * `EdfError::Io` - the underlying stream failed
pub fn parse_stream_detailed<R: Read>(file_name: &str, reader: R) -> Result<ValidRecord> {
    let mut reader = FixedWidthReader::new(reader);

    let general = read_general_header(&mut reader)?;

    if !has_valid_identifier(&general.identifier) {
        return Err(EdfError::InvalidIdentifier(general.identifier));
    }

    let mut signals = read_signal_header(&mut reader, general.num_signals)?;

    signals.annotation_count = count_annotations(
        &mut reader,
        general.num_data_records,
        &signals.samples_per_record,
        signals.annotation_channel_index,
    )?;

    debug!(
        "{}: decoded {} bytes, {} annotations",
        file_name,
        reader.bytes_consumed(),
        signals.annotation_count
    );

    Ok(ValidRecord {
        file_name: file_name.to_string(),
        recording_length_seconds: general.recording_length_seconds(),
        identifier: general.identifier,
        recording_start: general.recording_start,
        patient_name: general.patient_name,
        data_channels: signals.data_channels,
        annotation_count: signals.annotation_count,
    })
}

/// Opens `path` and decodes it with [`parse_stream`].
///
/// `file_name` of the result is the last path component. A file that cannot
/// be opened is reported as invalid as well. The handle is closed before
/// this function returns, whatever the outcome.
///
/// # Examples
///
/// ```rust
/// use edfcatalog::parse_file;
///
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().join("recording.edf");
/// # edfcatalog::doctest_utils::create_annotated_test_file(&path).unwrap();
/// let record = parse_file(&path);
///
/// assert!(record.is_valid());
/// assert_eq!(record.file_name(), "recording.edf");
/// assert_eq!(
///     record.recording_start().unwrap().to_string(),
///     "2025-09-01 10:00:00"
/// );
///
/// assert!(!parse_file(dir.path().join("missing.edf")).is_valid());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> FileRecord {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to open {}: {}", path.display(), e);
            return FileRecord::invalid(file_name);
        }
    };

    parse_stream(&file_name, BufReader::new(file))
}

fn has_valid_identifier(identifier: &str) -> bool {
    identifier.starts_with(IDENTIFIER_VERSION_CHAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctest_utils::{annotated_image, EdfImage, ImageSignal};
    use crate::types::Channel;
    use crate::{ANNOTATION_CHANNEL_LABEL, HEADER_GENERAL_BYTES};
    use std::io::Cursor;

    #[test]
    fn test_identifier_gate() {
        assert!(has_valid_identifier("0"));
        assert!(has_valid_identifier("0IDENT"));
        assert!(!has_valid_identifier(""));
        assert!(!has_valid_identifier("1"));
        assert!(!has_valid_identifier("BIOSEMI"));
    }

    #[test]
    fn test_valid_file() {
        let bytes = annotated_image().to_bytes();
        let record = parse_stream_detailed("a.edf", &bytes[..]).unwrap();

        assert_eq!(record.file_name, "a.edf");
        assert_eq!(record.identifier, "0IDENT");
        assert_eq!(record.patient_name, "Alice");
        assert_eq!(record.recording_start.to_string(), "2025-09-01 10:00:00");
        assert_eq!(
            record.data_channels,
            vec![Channel::new("Fp1", "T1"), Channel::new("Fp2", "T2")]
        );
        assert_eq!(record.recording_length_seconds, 10.0);
        assert_eq!(record.annotation_count, 3);
    }

    #[test]
    fn test_invalid_identifier_stops_after_general_header() {
        for identifier in ["", "1", "X0"] {
            let bytes = annotated_image().identifier(identifier).to_bytes();
            let mut cursor = Cursor::new(bytes);

            match parse_stream_detailed("bad.edf", &mut cursor) {
                Err(EdfError::InvalidIdentifier(found)) => assert_eq!(found, identifier),
                other => panic!("unexpected result: {:?}", other),
            }
            assert_eq!(cursor.position(), HEADER_GENERAL_BYTES as u64);

            cursor.set_position(0);
            assert_eq!(
                parse_stream("bad.edf", &mut cursor),
                FileRecord::invalid("bad.edf")
            );
        }
    }

    #[test]
    fn test_identifier_is_trimmed_before_check() {
        let bytes = annotated_image().identifier(" 0").to_bytes();
        assert!(parse_stream("lead.edf", &bytes[..]).is_valid());
    }

    #[test]
    fn test_truncated_data_records_are_invalid() {
        let bytes = annotated_image().to_bytes();
        let cut = &bytes[..bytes.len() - 1];

        assert!(matches!(
            parse_stream_detailed("cut.edf", cut),
            Err(EdfError::UnexpectedEndOfFile { .. })
        ));
        assert!(!parse_stream("cut.edf", cut).is_valid());
    }

    #[test]
    fn test_truncated_records_without_annotation_channel_are_valid() {
        // 没有注释通道时不会读取数据记录
        let bytes = EdfImage::new()
            .signal(ImageSignal::new("EEG", "AgAgCl", 256))
            .empty_records(10)
            .to_bytes();
        let header_only = &bytes[..HEADER_GENERAL_BYTES * 2];

        let record = parse_stream_detailed("plain.edf", header_only).unwrap();
        assert_eq!(record.annotation_count, 0);
        assert_eq!(record.recording_length_seconds, 10.0);
    }

    #[test]
    fn test_zero_signals_and_records() {
        let bytes = EdfImage::new().record_duration("0.5").to_bytes();
        let record = parse_stream_detailed("empty.edf", &bytes[..]).unwrap();

        assert!(record.data_channels.is_empty());
        assert_eq!(record.annotation_count, 0);
        assert_eq!(record.recording_length_seconds, 0.0);
    }

    #[test]
    fn test_malformed_stages_are_invalid() {
        let cases = [
            annotated_image().start("bad", "invalid"),
            annotated_image().num_signals_text("three"),
            annotated_image().record_duration(""),
            EdfImage::new().signal(ImageSignal::new("Fp1", "T1", 2).samples_text("?")),
        ];

        for image in cases {
            let bytes = image.to_bytes();
            assert_eq!(
                parse_stream("broken.edf", &bytes[..]),
                FileRecord::invalid("broken.edf")
            );
        }
    }

    #[test]
    fn test_signal_count_larger_than_header() {
        let bytes = annotated_image().num_signals_text("9").to_bytes();
        assert!(matches!(
            parse_stream_detailed("lying.edf", &bytes[..]),
            Err(EdfError::UnexpectedEndOfFile { .. })
        ));
    }

    #[test]
    fn test_only_annotation_channel() {
        let bytes = EdfImage::new()
            .signal(ImageSignal::new(ANNOTATION_CHANNEL_LABEL, "", 3))
            .record(vec![b"+0\x14\x14\0\0".to_vec()])
            .to_bytes();
        let record = parse_stream_detailed("annotations.edf", &bytes[..]).unwrap();

        assert!(record.data_channels.is_empty());
        assert_eq!(record.annotation_count, 2);
    }
}
