use crate::models::Outcome;
use anyhow::{Context, Result};
use csv::Writer;
use regex::Regex;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const RESULT_SUFFIX: &str = "Assigned";

/// Writes accepted outcomes as `name, Selection, Choice` tables.
pub struct ResultWriter<'a> {
    name_column: &'a str,
    unassigned_marker: &'a str,
    not_applicable_marker: &'a str,
}

impl<'a> ResultWriter<'a> {
    pub fn new(name_column: &'a str, unassigned_marker: &'a str, not_applicable_marker: &'a str) -> Self {
        Self {
            name_column,
            unassigned_marker,
            not_applicable_marker,
        }
    }

    /// Rows of the result table sorted by name, markers filled in.
    pub fn rows(&self, outcome: &Outcome) -> Vec<[String; 3]> {
        outcome
            .sorted_by_name()
            .into_iter()
            .map(|placement| match &placement.grant {
                Some(grant) => [
                    placement.name.clone(),
                    grant.resource.clone(),
                    grant.rank.to_string(),
                ],
                None => [
                    placement.name.clone(),
                    self.unassigned_marker.to_string(),
                    self.not_applicable_marker.to_string(),
                ],
            })
            .collect()
    }

    pub fn write_to<W: Write>(&self, outcome: &Outcome, sink: W) -> Result<()> {
        let mut writer = Writer::from_writer(sink);

        writer.write_record([self.name_column, "Selection", "Choice"])?;
        for row in self.rows(outcome) {
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Save next to the input (or into `output_dir`) under the first free
    /// `<stem> - Assigned <n>.csv` name. Existing files are never replaced.
    pub fn save(&self, outcome: &Outcome, input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "result".to_string());

        let mut number = next_free_number(&dir, &stem)?;
        loop {
            let path = dir.join(result_file_name(&stem, number));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    self.write_to(outcome, file)
                        .with_context(|| format!("Failed to write result file: {}", path.display()))?;
                    debug!(path = %path.display(), "saved result");
                    return Ok(path);
                }
                // Someone else claimed the name since the directory was scanned
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => number += 1,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create result file: {}", path.display()))
                }
            }
        }
    }
}

fn result_file_name(stem: &str, number: usize) -> String {
    format!("{} - {} {}.csv", stem, RESULT_SUFFIX, number)
}

/// Smallest positive number not yet used by a `<stem> - Assigned <n>` file of
/// any extension in `dir`.
fn next_free_number(dir: &Path, stem: &str) -> Result<usize> {
    let pattern = Regex::new(&format!(r"^{} - {} (\d+)$", regex::escape(stem), RESULT_SUFFIX))?;

    let mut used = HashSet::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))? {
        let path = entry?.path();
        let Some(existing) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(number) = pattern
            .captures(existing)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
        {
            used.insert(number);
        }
    }

    Ok((1..).find(|n| !used.contains(n)).unwrap_or(1))
}
