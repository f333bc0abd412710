use edfcatalog::doctest_utils::{annotated_image, EdfImage, ImageSignal};
use edfcatalog::{
    parse_file, parse_stream, read_general_header, Channel, EdfError, FileRecord,
    FixedWidthReader, ANNOTATION_CHANNEL_LABEL, HEADER_GENERAL_BYTES,
};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

// 在临时目录中写入测试文件的辅助函数
fn write_test_file(dir: &Path, name: &str, image: &EdfImage) -> PathBuf {
    let path = dir.join(name);
    image.write_to(&path).unwrap();
    path
}

// 创建一个四通道 EEG + 注释通道的测试文件
fn create_eeg_image(records: usize) -> EdfImage {
    let mut image = EdfImage::new()
        .identifier("0")
        .patient("MC001 F 15-MAR-1985 Multi_Channel_Test")
        .start("15.03.24", "08.30.15")
        .record_duration("0.5");

    for i in 0..4 {
        image = image.signal(ImageSignal::new(
            &format!("EEG C{}", i + 1),
            "AgAgCl electrodes",
            64,
        ));
    }
    image = image.signal(ImageSignal::new(ANNOTATION_CHANNEL_LABEL, "", 30));

    for second in 0..records {
        let mut channels: Vec<Vec<u8>> = (0..4).map(|_| vec![0x55; 128]).collect();
        // 每条记录一个时间戳 TAL: "+<n>\x14\x14\0"
        let mut tal = format!("+{}", second).into_bytes();
        tal.extend_from_slice(&[0x14, 0x14, 0x00]);
        tal.resize(60, 0x20);
        channels.push(tal);
        image = image.record(channels);
    }

    image
}

#[test]
fn test_basic_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_file(dir.path(), "session.edf", &annotated_image());

    let record = parse_file(&path);
    let valid = record.as_valid().expect("file should decode");

    assert_eq!(valid.file_name, "session.edf");
    assert_eq!(valid.identifier, "0IDENT");
    assert_eq!(valid.patient_name, "Alice");
    assert_eq!(valid.recording_start.to_string(), "2025-09-01 10:00:00");
    assert_eq!(
        valid.data_channels,
        vec![Channel::new("Fp1", "T1"), Channel::new("Fp2", "T2")]
    );
    assert_eq!(valid.recording_length_seconds, 10.0);
    assert_eq!(valid.annotation_count, 3);
}

#[test]
fn test_multi_channel_recording() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_file(dir.path(), "eeg.edf", &create_eeg_image(10));

    let record = parse_file(&path);
    let valid = record.as_valid().unwrap();

    assert_eq!(valid.patient_name, "MC001 F 15-MAR-1985 Multi_Channel_Test");
    assert_eq!(valid.recording_start.to_string(), "2024-03-15 08:30:15");
    assert_eq!(valid.data_channels.len(), 4);
    assert_eq!(valid.data_channels[3].name, "EEG C4");
    assert!(valid
        .data_channels
        .iter()
        .all(|c| c.transducer_type == "AgAgCl electrodes"));
    assert_eq!(valid.recording_length_seconds, 5.0);
    // 每条记录恰好一个 NUL
    assert_eq!(valid.annotation_count, 10);
}

#[test]
fn test_recording_length_is_exact_product() {
    for (records, duration, expected) in [
        (0usize, "1", 0.0),
        (3, "0.25", 0.75),
        (7, "30", 210.0),
        (1200, "0.1", 1200.0 * 0.1),
    ] {
        let image = EdfImage::new()
            .record_duration(duration)
            .num_data_records_text(&records.to_string())
            .signal(ImageSignal::new("ECG", "Chest", 1));
        let bytes = image.to_bytes();

        let mut reader = FixedWidthReader::new(&bytes[..]);
        let header = read_general_header(&mut reader).unwrap();
        assert_eq!(header.recording_length_seconds(), expected);

        // 没有注释通道，不需要数据记录
        let record = parse_stream("len.edf", &bytes[..]);
        assert_eq!(record.as_valid().unwrap().recording_length_seconds, expected);
    }
}

#[test]
fn test_short_streams_report_counts() {
    let bytes = annotated_image().to_bytes();

    for available in [0, 1, 128, 255] {
        let mut reader = FixedWidthReader::new(&bytes[..available]);
        match read_general_header(&mut reader) {
            Err(EdfError::UnexpectedEndOfFile { expected, actual }) => {
                assert_eq!(expected, HEADER_GENERAL_BYTES as u64);
                assert_eq!(actual, available as u64);
            }
            other => panic!("{} bytes => {:?}", available, other),
        }
        assert!(!parse_stream("short.edf", &bytes[..available]).is_valid());
    }
}

#[test]
fn test_identifier_gate_consumes_only_general_header() {
    let bytes = annotated_image().identifier("BIOSEMI").to_bytes();
    let mut cursor = Cursor::new(bytes);

    assert_eq!(
        parse_stream("biosemi.bdf", &mut cursor),
        FileRecord::invalid("biosemi.bdf")
    );
    assert_eq!(cursor.position(), HEADER_GENERAL_BYTES as u64);
}

#[test]
fn test_year_pivot_through_files() {
    let dir = tempfile::tempdir().unwrap();

    for (date, year) in [("02.01.85", 1985), ("19.09.19", 2019), ("01.01.84", 2084)] {
        let image = annotated_image().start(date, "03.04.05");
        let path = write_test_file(dir.path(), "pivot.edf", &image);

        let start = parse_file(&path).recording_start().unwrap();
        assert_eq!(start.format("%Y").to_string(), year.to_string());
    }
}

#[test]
fn test_unreadable_paths_are_invalid() {
    let dir = tempfile::tempdir().unwrap();

    let record = parse_file(dir.path().join("missing.edf"));
    assert_eq!(record, FileRecord::invalid("missing.edf"));

    // 目录无法作为文件读取
    fs::create_dir(dir.path().join("folder.edf")).unwrap();
    assert!(!parse_file(dir.path().join("folder.edf")).is_valid());
}

#[test]
fn test_random_garbage_never_panics() {
    // 简单的线性同余生成器，保证测试可重复
    let mut state = 0x2545F491u32;
    let mut next = move || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 16) as u8
    };

    for len in [0usize, 10, 256, 300, 1024, 4096] {
        let bytes: Vec<u8> = (0..len).map(|_| next()).collect();
        assert!(!parse_stream("noise.edf", &bytes[..]).is_valid());
    }
}

#[test]
fn test_json_output_matches_listing_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_file(dir.path(), "session.edf", &annotated_image());

    let json = serde_json::to_value(parse_file(&path)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "fileName": "session.edf",
            "valid": true,
            "identifier": "0IDENT",
            "recordingDate": "2025-09-01T10:00:00",
            "patientName": "Alice",
            "channels": [
                { "name": "Fp1", "type": "T1" },
                { "name": "Fp2", "type": "T2" }
            ],
            "recordingLengthSeconds": 10.0,
            "numberOfAnnotations": 3
        })
    );
}
