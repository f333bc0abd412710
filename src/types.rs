use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Values taken from the fixed 256-byte general header.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralHeader {
    pub identifier: String,
    pub patient_name: String,
    pub recording_start: NaiveDateTime,
    pub num_data_records: usize,
    pub record_duration_seconds: f64,
    pub num_signals: usize,
}

impl GeneralHeader {
    /// 记录总时长（秒）
    pub fn recording_length_seconds(&self) -> f64 {
        self.num_data_records as f64 * self.record_duration_seconds
    }
}

/// A data channel: its label and transducer type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Channel {
    pub name: String,
    #[serde(rename = "type")]
    pub transducer_type: String,
}

impl Channel {
    pub fn new(name: impl Into<String>, transducer_type: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            transducer_type: transducer_type.into(),
        }
    }
}

/// Values taken from the per-signal header blocks.
///
/// `labels`, `transducer_types` and `samples_per_record` are parallel and keep
/// the physical signal order of the file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalHeader {
    pub labels: Vec<String>,
    pub transducer_types: Vec<String>,
    pub samples_per_record: Vec<usize>,
    /// Position of the `EDF Annotations` signal; the last one if several carry that label.
    pub annotation_channel_index: Option<usize>,
    pub data_channels: Vec<Channel>,
    /// Filled in by the annotation scanner.
    pub annotation_count: u64,
}

impl SignalHeader {
    pub fn num_signals(&self) -> usize {
        self.labels.len()
    }
}

/// Metadata of a file that decoded successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    pub file_name: String,
    pub identifier: String,
    pub recording_start: NaiveDateTime,
    pub patient_name: String,
    pub data_channels: Vec<Channel>,
    pub recording_length_seconds: f64,
    /// NUL bytes found in the annotation channel. An approximation of the
    /// number of TAL entries, not an exact count.
    pub annotation_count: u64,
}

/// Outcome of decoding one file.
///
/// A file is either wholly valid or wholly invalid; an invalid record carries
/// nothing but its file name.
#[derive(Debug, Clone, PartialEq)]
pub enum FileRecord {
    Valid(ValidRecord),
    Invalid { file_name: String },
}

impl FileRecord {
    pub fn invalid(file_name: impl Into<String>) -> Self {
        FileRecord::Invalid {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            FileRecord::Valid(record) => &record.file_name,
            FileRecord::Invalid { file_name } => file_name,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FileRecord::Valid(_))
    }

    pub fn as_valid(&self) -> Option<&ValidRecord> {
        match self {
            FileRecord::Valid(record) => Some(record),
            FileRecord::Invalid { .. } => None,
        }
    }

    pub fn recording_start(&self) -> Option<NaiveDateTime> {
        self.as_valid().map(|record| record.recording_start)
    }
}

impl From<ValidRecord> for FileRecord {
    fn from(record: ValidRecord) -> Self {
        FileRecord::Valid(record)
    }
}

impl Serialize for FileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FileRecord::Invalid { file_name } => {
                let mut state = serializer.serialize_struct("FileRecord", 2)?;
                state.serialize_field("fileName", file_name)?;
                state.serialize_field("valid", &false)?;
                state.end()
            }
            FileRecord::Valid(record) => {
                let mut state = serializer.serialize_struct("FileRecord", 8)?;
                state.serialize_field("fileName", &record.file_name)?;
                state.serialize_field("valid", &true)?;
                state.serialize_field("identifier", &record.identifier)?;
                state.serialize_field("recordingDate", &record.recording_start)?;
                state.serialize_field("patientName", &record.patient_name)?;
                state.serialize_field("channels", &record.data_channels)?;
                state.serialize_field("recordingLengthSeconds", &record.recording_length_seconds)?;
                state.serialize_field("numberOfAnnotations", &record.annotation_count)?;
                state.end()
            }
        }
    }
}

/// Orders records by recording start, earliest first, records without a
/// start (invalid files) last.
pub fn compare_by_recording_start(a: &FileRecord, b: &FileRecord) -> Ordering {
    match (a.recording_start(), b.recording_start()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort using [`compare_by_recording_start`].
pub fn sort_by_recording_start(records: &mut [FileRecord]) {
    records.sort_by(compare_by_recording_start);
}
