/**
 * RecoPrep
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::fmt::Display;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Row, Table};

/// Reads a delimited input file. Headers are handled by the caller, as the header row may be
/// preceded by other rows.
pub fn csv_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<File>> {

    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;

    Ok(reader)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or(0)
}

/// Reads the raw interaction table. The first two columns hold the user and item ids, all other
/// columns are kept as they are. If `header` is `Some(n)`, the `n` leading rows are skipped and
/// row `n` provides the column names, otherwise columns are named by their position.
pub fn read_interactions(
    path: &Path,
    delimiter: u8,
    header: Option<usize>,
) -> Result<Table<String>> {

    let mut reader = csv_reader(path, delimiter)?;

    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (row_index, record) in reader.records().enumerate() {
        let record = record?;

        if let Some(header_index) = header {
            if row_index < header_index {
                continue;
            }
            if row_index == header_index {
                columns = Some(record.iter().map(String::from).collect());
                continue;
            }
        }

        let expected_len = columns.as_ref().map(Vec::len).unwrap_or_else(|| record.len());

        if record.len() < 2 {
            return Err(Error::Malformed {
                line: line_of(&record),
                reason: format!("expected a user and an item column, found {} column(s)",
                    record.len()),
            });
        }

        if record.len() != expected_len {
            return Err(Error::Malformed {
                line: line_of(&record),
                reason: format!("expected {} columns, found {}", expected_len, record.len()),
            });
        }

        if columns.is_none() {
            columns = Some((0..record.len()).map(|position| position.to_string()).collect());
        }

        rows.push(Row::new(
            record[0].to_string(),
            record[1].to_string(),
            record.iter().skip(2).map(String::from).collect(),
        ));
    }

    let columns = columns.unwrap_or_else(|| vec!["0".to_string(), "1".to_string()]);

    if columns.len() < 2 {
        return Err(Error::Malformed {
            line: header.map(|index| index as u64 + 1).unwrap_or(1),
            reason: "the header names fewer than two columns".to_string(),
        });
    }

    Ok(Table::new(columns, rows))
}

/// Writes one id per line, the line number is the mapped index of the id.
pub fn write_ids<K: Display>(path: &Path, ids: &[K]) -> Result<()> {

    let mut out = BufWriter::new(File::create(path)?);

    for id in ids {
        writeln!(out, "{}", id)?;
    }
    out.flush()?;

    Ok(())
}

pub fn read_ids(path: &Path) -> Result<Vec<String>> {

    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let mut ids = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        ids.push(line?.trim().to_string());
    }

    Ok(ids)
}

/// Writes a numerized table as comma-separated values with a header row.
pub fn write_table(path: &Path, table: &Table<u32>) -> Result<()> {

    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(2 + row.extra.len());
        record.push(row.user.to_string());
        record.push(row.item.to_string());
        record.extend(row.extra.iter().cloned());

        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads a table written by `write_table`.
pub fn read_table(path: &Path) -> Result<Table<u32>> {

    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    if columns.len() < 2 {
        return Err(Error::Malformed {
            line: 1,
            reason: format!("{} lacks the uid and iid columns", path.display()),
        });
    }

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;

        let user = parse_index(&record, 0)?;
        let item = parse_index(&record, 1)?;

        rows.push(Row::new(user, item, record.iter().skip(2).map(String::from).collect()));
    }

    Ok(Table::new(columns, rows))
}

fn parse_index(record: &csv::StringRecord, column: usize) -> Result<u32> {
    let field = record.get(column).unwrap_or("");

    field.trim().parse::<u32>().map_err(|_| Error::Malformed {
        line: line_of(record),
        reason: format!("'{}' is not a mapped id", field),
    })
}
