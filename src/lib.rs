//! # EDF catalog
//!
//! Metadata extraction for EDF and EDF+ (European Data Format) recordings.
//! The crate does not read signal samples; it decodes the fixed-layout header,
//! separates real signals from the EDF+ annotation channel, and walks the data
//! records once to estimate how many annotations the file carries.
//!
//! ## Quick Start
//!
//! ### Decoding a single file
//!
//! ```rust
//! use edfcatalog::{parse_file, FileRecord};
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("recording.edf");
//! # edfcatalog::doctest_utils::create_annotated_test_file(&path).unwrap();
//!
//! match parse_file(&path) {
//!     FileRecord::Valid(record) => {
//!         println!("Patient: {}", record.patient_name);
//!         println!("Started: {}", record.recording_start);
//!         println!("Length: {:.1} s", record.recording_length_seconds);
//!         for channel in &record.data_channels {
//!             println!("  {} ({})", channel.name, channel.transducer_type);
//!         }
//!         println!("~{} annotations", record.annotation_count);
//!     }
//!     FileRecord::Invalid { file_name } => println!("{} is not a valid EDF file", file_name),
//! }
//! ```
//!
//! ### Cataloguing a directory
//!
//! ```rust
//! use edfcatalog::{Catalog, CatalogConfig};
//! # let dir = tempfile::tempdir().unwrap();
//! # edfcatalog::doctest_utils::create_annotated_test_file(dir.path().join("a.edf")).unwrap();
//! # edfcatalog::doctest_utils::create_invalid_test_file(dir.path().join("b.EDF")).unwrap();
//!
//! let config = CatalogConfig {
//!     directory: dir.path().to_path_buf(),
//!     ..CatalogConfig::default()
//! };
//! let catalog = Catalog::scan(&config)?;
//!
//! // Sorted by recording start, invalid files last
//! assert_eq!(catalog.len(), 2);
//! assert!(catalog.records()[0].is_valid());
//! assert!(!catalog.records()[1].is_valid());
//! # Ok::<(), edfcatalog::EdfError>(())
//! ```
//!
//! ## Error handling
//!
//! The lower level decoders ([`read_general_header`], [`read_signal_header`],
//! [`count_annotations`], [`FixedWidthReader`]) return [`EdfError`]. The record
//! assembler ([`parse_stream`], [`parse_file`]) never does: any failure turns
//! the file into [`FileRecord::Invalid`], which carries nothing but the file
//! name.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger
//! itself; the `edf-catalog` binary uses `env_logger`.

pub mod annotations;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fixed_width;
pub mod header;
pub mod reader;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub mod doctest_utils; // For doctest and test support

// Re-export main types for convenience
pub use annotations::count_annotations;
pub use catalog::{collect_edf_paths, scan_directory, Catalog};
pub use config::CatalogConfig;
pub use error::{EdfError, Result};
pub use fixed_width::FixedWidthReader;
pub use header::{read_general_header, read_signal_header};
pub use reader::{parse_file, parse_stream, parse_stream_detailed};
pub use types::{
    compare_by_recording_start, sort_by_recording_start, Channel, FileRecord, GeneralHeader,
    SignalHeader, ValidRecord,
};

// Important constants
pub const HEADER_GENERAL_BYTES: usize = 256;
pub const BYTES_PER_SAMPLE: u64 = 2;
pub const ANNOTATION_CHANNEL_LABEL: &str = "EDF Annotations";
pub const TAL_DELIMITER: u8 = 0x00;
pub const IDENTIFIER_VERSION_CHAR: char = '0';

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
