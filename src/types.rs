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

use std::fmt;

use sprs::CsMat;

/// Row-compressed user x item matrix, as consumed by training and evaluation code.
pub type SparseMatrix = CsMat<f64>;

/// A single interaction between a user and an item. Any columns after the first two (e.g. a
/// rating or a timestamp) are carried along verbatim in `extra`.
#[derive(Clone, Debug, PartialEq)]
pub struct Row<K> {
    pub user: K,
    pub item: K,
    pub extra: Vec<String>,
}

impl<K> Row<K> {
    pub fn new(user: K, item: K, extra: Vec<String>) -> Self {
        Row { user, item, extra }
    }
}

/// An interaction table. `columns` holds the names of ALL columns, including the user and item
/// columns in the first two positions. There is no uniqueness constraint on the rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Table<K> {
    pub columns: Vec<String>,
    pub rows: Vec<Row<K>>,
}

impl<K> Table<K> {

    pub fn new(columns: Vec<String>, rows: Vec<Row<K>>) -> Self {
        Table { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Names of the columns following the user and item columns.
    pub fn extra_columns(&self) -> &[String] {
        if self.columns.len() > 2 { &self.columns[2..] } else { &[] }
    }

    /// A table with the same columns, retaining only the rows matching `predicate`.
    pub fn retain_rows<F>(&self, predicate: F) -> Self
        where F: Fn(&Row<K>) -> bool, K: Clone {

        let rows = self.rows.iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect();

        Table { columns: self.columns.clone(), rows }
    }
}

/// Whether interactions carry a value (explicit ratings) or only their presence matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Top-N mode: only `(uid, iid)` is persisted, every entry is weighted 1.0.
    Implicit,
    /// The value column(s) are persisted, the first one becomes the matrix entry.
    Explicit,
}

/// The user-level partitions produced by the preprocessing, plus the stacked `Full` view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partition {
    Train,
    Validation,
    Test,
    Full,
}

impl Partition {

    /// File name stem of the persisted table(s) for this partition.
    pub fn name(&self) -> &'static str {
        match *self {
            Partition::Train => "train",
            Partition::Validation => "validation",
            Partition::Test => "test",
            Partition::Full => "full",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of loading a partition: the train and full views are single matrices, validation and
/// test come as a row-aligned pair of observed ("tr") and held-out ("te") interactions.
#[derive(Debug)]
pub enum Loaded {
    Single(SparseMatrix),
    Pair(SparseMatrix, SparseMatrix),
}
