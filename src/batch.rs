//! File and folder conversion
//!
//! Reads SQL files from disk, converts each one independently and writes the
//! Terraform output next to the input as `<stem>.tf`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use rayon::prelude::*;

use crate::error::ConvertError;
use crate::parser::Diagnostic;
use crate::terraform::ConvertOptions;
use crate::{convert_sql, Conversion};

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Outcome of converting one file in a folder
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug)]
pub enum FileOutcome {
    Converted {
        output: PathBuf,
        objects: usize,
        resources: usize,
        diagnostics: Vec<Diagnostic>,
    },
    Failed(anyhow::Error),
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FileOutcome::Converted { .. })
    }
}

/// Read a SQL file as a string, trying UTF-8 first, then Windows-1252 as fallback.
///
/// A UTF-8 byte order mark is removed.
pub fn read_sql_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => {
            // SQL files saved on Windows are commonly Windows-1252
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                Err(ConvertError::InvalidEncoding {
                    path: path.to_path_buf(),
                }
                .into())
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Find files under `dir` with the given extension (case-insensitive), sorted by path
pub fn find_sql_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(|e| ConvertError::DirectoryWalkError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            files.push(path.to_path_buf());
        }
    }

    if files.is_empty() {
        return Err(ConvertError::NoInputFiles {
            path: dir.to_path_buf(),
            extension: extension.to_string(),
        }
        .into());
    }

    files.sort();
    Ok(files)
}

/// Read and convert a single SQL file
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<Conversion> {
    let sql = read_sql_file(path)?;
    Ok(convert_sql(&sql, options))
}

/// Convert every matching file under `dir`, writing `<stem>.tf` beside each input.
///
/// A file that fails to read or write is reported and does not stop the others.
pub fn convert_directory(
    dir: &Path,
    extension: &str,
    options: &ConvertOptions,
) -> Result<Vec<FileReport>> {
    let files = find_sql_files(dir, extension)?;

    let reports = if files.len() >= PARALLEL_THRESHOLD {
        files
            .par_iter()
            .map(|file| convert_and_write(file, options))
            .collect()
    } else {
        files
            .iter()
            .map(|file| convert_and_write(file, options))
            .collect()
    };

    Ok(reports)
}

fn convert_and_write(input: &Path, options: &ConvertOptions) -> FileReport {
    let outcome = match write_conversion(input, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("Failed to convert {}: {:#}", input.display(), e);
            FileOutcome::Failed(e)
        }
    };
    FileReport {
        input: input.to_path_buf(),
        outcome,
    }
}

fn write_conversion(input: &Path, options: &ConvertOptions) -> Result<FileOutcome> {
    let conversion = convert_file(input, options)?;
    let output = input.with_extension("tf");
    std::fs::write(&output, &conversion.output).map_err(|e| ConvertError::FileWriteError {
        path: output.clone(),
        source: e,
    })?;

    Ok(FileOutcome::Converted {
        output,
        objects: conversion.objects.len(),
        resources: conversion.resources.len(),
        diagnostics: conversion.diagnostics,
    })
}
