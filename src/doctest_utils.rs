// Internal utilities for documentation tests and the test suites.
// Builds byte-exact EDF images so no binary fixtures are needed.

use std::fs;
use std::io;
use std::path::Path;

use crate::{ANNOTATION_CHANNEL_LABEL, HEADER_GENERAL_BYTES};

/// One signal of an [`EdfImage`].
#[derive(Debug, Clone)]
pub struct ImageSignal {
    label: String,
    transducer: String,
    samples_per_record: usize,
    samples_text: Option<String>,
}

impl ImageSignal {
    pub fn new(label: &str, transducer: &str, samples_per_record: usize) -> Self {
        ImageSignal {
            label: label.to_string(),
            transducer: transducer.to_string(),
            samples_per_record,
            samples_text: None,
        }
    }

    /// Writes `text` into the samples-per-record field instead of the number.
    /// The layout of data records still follows `samples_per_record`.
    pub fn samples_text(mut self, text: &str) -> Self {
        self.samples_text = Some(text.to_string());
        self
    }

    fn is_annotation(&self) -> bool {
        self.label == ANNOTATION_CHANNEL_LABEL
    }
}

/// Builder for an in-memory EDF/EDF+ file.
///
/// Every data record holds each signal's bytes padded with NUL up to
/// `samples_per_record × 2`, which is also how EDF+ pads annotation signals.
#[derive(Debug, Clone)]
pub struct EdfImage {
    identifier: String,
    patient: String,
    recording: String,
    start_date: String,
    start_time: String,
    record_duration: String,
    num_data_records_text: Option<String>,
    num_signals_text: Option<String>,
    signals: Vec<ImageSignal>,
    records: Vec<Vec<Vec<u8>>>,
}

impl Default for EdfImage {
    fn default() -> Self {
        EdfImage {
            identifier: "0".to_string(),
            patient: "X X X X".to_string(),
            recording: "Startdate X X X X".to_string(),
            start_date: "01.01.20".to_string(),
            start_time: "00.00.00".to_string(),
            record_duration: "1".to_string(),
            num_data_records_text: None,
            num_signals_text: None,
            signals: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl EdfImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, identifier: &str) -> Self {
        self.identifier = identifier.to_string();
        self
    }

    pub fn patient(mut self, patient: &str) -> Self {
        self.patient = patient.to_string();
        self
    }

    pub fn start(mut self, date: &str, time: &str) -> Self {
        self.start_date = date.to_string();
        self.start_time = time.to_string();
        self
    }

    pub fn record_duration(mut self, seconds: &str) -> Self {
        self.record_duration = seconds.to_string();
        self
    }

    /// Overrides the data-record count field; by default it is the number of
    /// records added.
    pub fn num_data_records_text(mut self, text: &str) -> Self {
        self.num_data_records_text = Some(text.to_string());
        self
    }

    /// Overrides the signal count field; by default it is the number of signals added.
    pub fn num_signals_text(mut self, text: &str) -> Self {
        self.num_signals_text = Some(text.to_string());
        self
    }

    pub fn signal(mut self, signal: ImageSignal) -> Self {
        self.signals.push(signal);
        self
    }

    /// Adds a data record; `channels[i]` holds the bytes of signal `i`.
    pub fn record(mut self, channels: Vec<Vec<u8>>) -> Self {
        self.records.push(channels);
        self
    }

    /// Adds `count` records whose bytes are all NUL.
    pub fn empty_records(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.records.push(Vec::new());
        }
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.signals.len();
        let mut bytes = Vec::with_capacity(HEADER_GENERAL_BYTES * (n + 1));

        // 主头部 (256字节)
        let reserved = if self.signals.iter().any(ImageSignal::is_annotation) {
            "EDF+C"
        } else {
            ""
        };
        let num_records = self
            .num_data_records_text
            .clone()
            .unwrap_or_else(|| self.records.len().to_string());
        let num_signals = self.num_signals_text.clone().unwrap_or_else(|| n.to_string());

        push_padded(&mut bytes, &self.identifier, 8);
        push_padded(&mut bytes, &self.patient, 80);
        push_padded(&mut bytes, &self.recording, 80);
        push_padded(&mut bytes, &self.start_date, 8);
        push_padded(&mut bytes, &self.start_time, 8);
        push_padded(&mut bytes, &(HEADER_GENERAL_BYTES * (n + 1)).to_string(), 8);
        push_padded(&mut bytes, reserved, 44);
        push_padded(&mut bytes, &num_records, 8);
        push_padded(&mut bytes, &self.record_duration, 8);
        push_padded(&mut bytes, &num_signals, 4);

        // 信号头部
        self.column(&mut bytes, 16, |s| s.label.clone());
        self.column(&mut bytes, 80, |s| s.transducer.clone());
        self.column(&mut bytes, 8, |s| (if s.is_annotation() { "" } else { "uV" }).to_string());
        self.column(&mut bytes, 8, |s| (if s.is_annotation() { "-1" } else { "-200" }).to_string());
        self.column(&mut bytes, 8, |s| (if s.is_annotation() { "1" } else { "200" }).to_string());
        self.column(&mut bytes, 8, |_| "-32768".to_string());
        self.column(&mut bytes, 8, |_| "32767".to_string());
        self.column(&mut bytes, 80, |_| String::new());
        self.column(&mut bytes, 8, |s| {
            s.samples_text
                .clone()
                .unwrap_or_else(|| s.samples_per_record.to_string())
        });
        self.column(&mut bytes, 32, |_| String::new());

        // 数据记录
        for record in &self.records {
            for (i, signal) in self.signals.iter().enumerate() {
                let width = signal.samples_per_record * 2;
                let data = record.get(i).map(Vec::as_slice).unwrap_or(&[]);
                let take = data.len().min(width);
                bytes.extend_from_slice(&data[..take]);
                bytes.resize(bytes.len() + (width - take), 0x00);
            }
        }

        bytes
    }

    fn column<F>(&self, bytes: &mut Vec<u8>, width: usize, value: F)
    where
        F: Fn(&ImageSignal) -> String,
    {
        for signal in &self.signals {
            push_padded(bytes, &value(signal), width);
        }
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.to_bytes())
    }
}

fn push_padded(bytes: &mut Vec<u8>, value: &str, width: usize) {
    let raw = value.as_bytes();
    let take = raw.len().min(width);
    bytes.extend_from_slice(&raw[..take]);
    bytes.resize(bytes.len() + (width - take), b' ');
}

/// Creates an EDF+ file with two EEG channels and an annotation channel.
///
/// Layout: samples per record `[2, 3, 4]`, two records, three NUL bytes in
/// the annotation channel overall, start `2025-09-01 10:00:00`, 10 seconds.
pub fn create_annotated_test_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    annotated_image().write_to(path)
}

/// The image behind [`create_annotated_test_file`].
pub fn annotated_image() -> EdfImage {
    EdfImage::new()
        .identifier("0IDENT")
        .patient("Alice")
        .start("01.09.25", "10.00.00")
        .record_duration("5")
        .signal(ImageSignal::new("Fp1", "T1", 2))
        .signal(ImageSignal::new("Fp2", "T2", 3))
        .signal(ImageSignal::new(ANNOTATION_CHANNEL_LABEL, "AnnType", 4))
        .record(vec![
            vec![7; 4],
            vec![7; 6],
            vec![0x00, 1, 2, 0x00, 3, 4, 5, 6],
        ])
        .record(vec![
            vec![7; 4],
            vec![7; 6],
            vec![9, 8, 7, 6, 5, 4, 3, 0x00],
        ])
}

/// Creates a plain EDF file (no annotation channel) starting `1999-12-31 23:59:59`.
pub fn create_plain_test_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    EdfImage::new()
        .patient("Bob")
        .start("31.12.99", "23.59.59")
        .record_duration("1")
        .signal(ImageSignal::new("EEG C3", "AgAgCl electrodes", 8))
        .empty_records(3)
        .write_to(path)
}

/// Creates a file the decoder rejects: its identifier does not start with `0`.
pub fn create_invalid_test_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    EdfImage::new()
        .identifier("BIOSEMI")
        .signal(ImageSignal::new("EEG C3", "AgAgCl electrodes", 8))
        .empty_records(1)
        .write_to(path)
}
