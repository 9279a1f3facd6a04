use crate::models::{Entity, Table};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Enumeration of errors raised while reading a preference table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse table")]
    Parse(#[from] csv::Error),
    #[error("table has no columns")]
    NoColumns,
    #[error("line {line} has {width} cells but the header declares {expected}")]
    RowTooWide {
        line: u64,
        width: usize,
        expected: usize,
    },
    #[error("line {line} ({name}) lists the reserved value {marker:?} as a choice")]
    ReservedMarker {
        line: u64,
        name: String,
        marker: String,
    },
}

/// Reads delimited preference tables: a name column followed by choice
/// columns in rank order.
pub struct TableLoader {
    delimiter: u8,
    unassigned_marker: String,
}

impl TableLoader {
    pub fn new(delimiter: u8, unassigned_marker: impl Into<String>) -> Self {
        Self {
            delimiter,
            unassigned_marker: unassigned_marker.into(),
        }
    }

    pub fn load_file(&self, path: &Path) -> Result<Table, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let table = self.load_reader(file)?;
        debug!(
            path = %path.display(),
            rows = table.entities.len(),
            choices = table.width,
            "loaded preference table"
        );
        Ok(table)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Table, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(LoadError::NoColumns);
        }

        let name_column = headers.get(0).unwrap_or_default().trim().to_string();
        let width = headers.len() - 1;

        let mut entities = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let entity = self.parse_record(&record, line, width)?;

            if !entity.has_choices() {
                warn!(line, name = %entity.name, "row has no choices and will be ignored");
            }
            entities.push(entity);
        }

        Ok(Table {
            name_column,
            width,
            entities,
        })
    }

    fn parse_record(&self, record: &StringRecord, line: u64, width: usize) -> Result<Entity, LoadError> {
        let name = record.get(0).unwrap_or_default().trim().to_string();

        let mut choices: Vec<Option<String>> = record
            .iter()
            .skip(1)
            .map(|cell| {
                let cell = cell.trim();
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();

        // Blank cells past the last column are not choices
        while choices.len() > width && choices.last() == Some(&None) {
            choices.pop();
        }
        if choices.len() > width {
            return Err(LoadError::RowTooWide {
                line,
                width: choices.len() + 1,
                expected: width + 1,
            });
        }

        // Short rows mean the remaining choices were left blank
        choices.resize(width, None);

        if choices.iter().flatten().any(|choice| *choice == self.unassigned_marker) {
            return Err(LoadError::ReservedMarker {
                line,
                name,
                marker: self.unassigned_marker.clone(),
            });
        }

        Ok(Entity::new(name, choices))
    }
}
