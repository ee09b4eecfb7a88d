// Primitives for reading the published data files.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::senate::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Opens a data file and skips the information line and the column headers.
///
/// Returns the records with the line number of the first record.
pub fn get_records(
    path: &str,
    delimiter: u8,
) -> SenateResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..2 {
        _ = records.next();
    }
    Ok((records, 3))
}

/// A line of a data file, with enough context to report errors.
pub struct DataLine<'a> {
    pub path: &'a str,
    pub lineno: usize,
    pub record: StringRecord,
}

impl<'a> DataLine<'a> {
    pub fn get(&self, column: usize) -> SenateResult<&str> {
        self.record
            .get(column)
            .map(|s| s.trim())
            .context(CsvLineTooShortSnafu {
                path: self.path,
                lineno: self.lineno,
                column,
            })
    }

    pub fn get_u32(&self, column: usize) -> SenateResult<u32> {
        let s = self.get(column)?;
        s.parse::<u32>().ok().context(CsvNumberSnafu {
            path: self.path,
            lineno: self.lineno,
            value: s,
        })
    }

    pub fn get_f64(&self, column: usize) -> SenateResult<f64> {
        let s = self.get(column)?;
        s.parse::<f64>().ok().context(CsvNumberSnafu {
            path: self.path,
            lineno: self.lineno,
            value: s,
        })
    }

    /// Like get_u32, but a blank cell gives None.
    pub fn get_optional_u32(&self, column: usize) -> SenateResult<Option<u32>> {
        match self.get(column)? {
            "" => Ok(None),
            _ => self.get_u32(column).map(Some),
        }
    }
}

/// Iterates over the lines of a data file.
pub fn read_lines<'a>(
    path: &'a str,
    delimiter: u8,
) -> SenateResult<impl Iterator<Item = SenateResult<DataLine<'a>>>> {
    let (records, first_lineno) = get_records(path, delimiter)?;
    Ok(records.enumerate().map(move |(idx, line_r)| {
        let lineno = idx + first_lineno;
        let record = line_r.context(CsvLineParseSnafu { path, lineno })?;
        Ok(DataLine {
            path,
            lineno,
            record,
        })
    }))
}
