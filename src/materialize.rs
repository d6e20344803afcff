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
use std::fs;
use std::hash::Hash;
use std::path::Path;

use crate::error::Result;
use crate::io;
use crate::stats::IdMap;
use crate::types::{Mode, Row, Table};

pub const USER_IDS_FILE: &str = "unique_uid.txt";
pub const ITEM_IDS_FILE: &str = "unique_iid.txt";

/// Names of the persisted tables, in the order they are written.
pub const TABLE_NAMES: [&str; 5] = ["train", "validation_tr", "validation_te", "test_tr", "test_te"];

pub fn table_file(name: &str) -> String {
    format!("{}.csv", name)
}

/// Replaces user and item ids by their mapped indices. In implicit mode only `(uid, iid)` is
/// kept, otherwise all other columns follow in their original order.
///
/// Fails with `Error::UnknownId` if an id is missing from its map, which means that an id
/// outside of the vocabulary leaked into a table to be written.
pub fn numerize<K>(
    table: &Table<K>,
    users: &IdMap<K>,
    items: &IdMap<K>,
    mode: Mode,
) -> Result<Table<u32>>
    where K: Hash + Eq + Clone + Display {

    let mut columns = vec!["uid".to_string(), "iid".to_string()];
    if mode == Mode::Explicit {
        columns.extend(table.extra_columns().iter().cloned());
    }

    let mut rows = Vec::with_capacity(table.len());

    for row in &table.rows {
        let extra = match mode {
            Mode::Implicit => Vec::new(),
            Mode::Explicit => row.extra.clone(),
        };

        rows.push(Row::new(users.index(&row.user)?, items.index(&row.item)?, extra));
    }

    Ok(Table::new(columns, rows))
}

/// The five tables produced by the splitting, still carrying external ids.
#[derive(Clone, Debug)]
pub struct Splits {
    pub train: Table<String>,
    pub validation_tr: Table<String>,
    pub validation_te: Table<String>,
    pub test_tr: Table<String>,
    pub test_te: Table<String>,
}

impl Splits {
    fn tables(&self) -> [&Table<String>; 5] {
        [&self.train, &self.validation_tr, &self.validation_te, &self.test_tr, &self.test_te]
    }
}

/// Numerizes all tables and writes them together with both id lists to `dir`, which is created
/// if necessary. All lookups happen before the first file is touched. Existing files are
/// overwritten one by one, so a crash midway leaves a mix of old and new files.
///
/// Returns the number of rows written per table, in the order of `TABLE_NAMES`.
pub fn write_splits(
    dir: &Path,
    splits: &Splits,
    users: &IdMap<String>,
    items: &IdMap<String>,
    mode: Mode,
) -> Result<[usize; 5]> {

    let mut numerized = Vec::with_capacity(TABLE_NAMES.len());
    for table in splits.tables().iter() {
        numerized.push(numerize(*table, users, items, mode)?);
    }

    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    tracing::info!("Saving {}.", ITEM_IDS_FILE);
    io::write_ids(&dir.join(ITEM_IDS_FILE), items.ids())?;

    tracing::info!("Saving {}.", USER_IDS_FILE);
    io::write_ids(&dir.join(USER_IDS_FILE), users.ids())?;

    tracing::info!("Saving all the files.");
    let mut sizes = [0; 5];
    for (position, (name, table)) in TABLE_NAMES.iter().zip(numerized.iter()).enumerate() {
        io::write_table(&dir.join(table_file(name)), table)?;
        sizes[position] = table.len();
    }

    Ok(sizes)
}
