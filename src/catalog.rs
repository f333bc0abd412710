//! Directory scanning: find EDF files, decode them on a pool of threads and
//! keep the results sorted for display.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::reader::parse_file;
use crate::types::{sort_by_recording_start, FileRecord, ValidRecord};

/// Lists every regular file below `config.directory` with the configured
/// extension, in path order.
pub fn collect_edf_paths(config: &CatalogConfig) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    walk(&config.directory, config, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn walk(dir: &Path, config: &CatalogConfig, paths: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, config, paths)?;
        } else if path.is_file() && config.matches_extension(&path) {
            // path.is_file() 会跟随符号链接
            paths.push(path);
        }
    }
    Ok(())
}

/// Decodes every EDF file found by [`collect_edf_paths`].
///
/// Files are decoded on a pool of `config.workers` threads. Each file is
/// decoded independently; a broken file becomes an invalid record and does
/// not stop the scan. The result is sorted with [`sort_by_recording_start`];
/// records that compare equal keep path order.
///
/// # Errors
///
/// Only failures to traverse the directory or to start the thread pool are
/// returned.
pub fn scan_directory(config: &CatalogConfig) -> Result<Vec<FileRecord>> {
    info!("Scanning EDF directory: {}", config.directory.display());

    let paths = collect_edf_paths(config)?;
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()?;

    // 并行 collect 保持输入顺序，即路径顺序
    let mut records: Vec<FileRecord> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let record = parse_file(path);
                info!("Processed EDF file: {}", record.file_name());
                record
            })
            .collect()
    });

    sort_by_recording_start(&mut records);
    Ok(records)
}

/// The sorted result of one directory scan.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<FileRecord>,
}

impl Catalog {
    pub fn scan(config: &CatalogConfig) -> Result<Self> {
        Ok(Catalog {
            records: scan_directory(config)?,
        })
    }

    /// Builds a catalog from already decoded records, sorting them.
    pub fn from_records(mut records: Vec<FileRecord>) -> Self {
        sort_by_recording_start(&mut records);
        Catalog { records }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn valid_records(&self) -> impl Iterator<Item = &ValidRecord> {
        self.records.iter().filter_map(FileRecord::as_valid)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}
