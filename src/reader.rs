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

use std::path::{Path, PathBuf};

use sprs::{CsMat, TriMat};

use crate::config::DataConfig;
use crate::error::{Error, IdKind, Result};
use crate::io;
use crate::materialize::{self, ITEM_IDS_FILE, USER_IDS_FILE};
use crate::stats::IdMap;
use crate::types::{Loaded, Mode, Partition, SparseMatrix, Table};

/// Reconstructs sparse user x item matrices from a directory written by the preprocessing. All
/// matrices share the same number of columns, the number of persisted item ids.
pub struct DataReader {
    proc_path: PathBuf,
    mode: Mode,
    n_items: usize,
}

impl DataReader {

    pub fn new(config: &DataConfig) -> Result<Self> {
        DataReader::from_dir(&config.proc_path, config.mode())
    }

    pub fn from_dir<P: AsRef<Path>>(proc_path: P, mode: Mode) -> Result<Self> {
        let proc_path = proc_path.as_ref().to_path_buf();
        let n_items = io::read_ids(&proc_path.join(ITEM_IDS_FILE))?.len();

        Ok(DataReader { proc_path, mode, n_items })
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    pub fn load(&self, partition: Partition) -> Result<Loaded> {
        match partition {
            Partition::Train => self.train().map(Loaded::Single),
            Partition::Validation | Partition::Test => {
                let (tr, te) = self.observed_and_heldout(partition)?;
                Ok(Loaded::Pair(tr, te))
            },
            Partition::Full => self.full().map(Loaded::Single),
        }
    }

    /// The training interactions, one row per user id from zero to the largest training uid.
    pub fn train(&self) -> Result<SparseMatrix> {
        let table = self.read(&materialize::table_file("train"))?;
        let entries = self.entries(&table, "train")?;

        let num_rows = entries.iter().map(|&(user, _, _)| user as usize + 1).max().unwrap_or(0);

        self.to_matrix(&entries, 0, num_rows, "train")
    }

    pub fn validation(&self) -> Result<(SparseMatrix, SparseMatrix)> {
        self.observed_and_heldout(Partition::Validation)
    }

    pub fn test(&self) -> Result<(SparseMatrix, SparseMatrix)> {
        self.observed_and_heldout(Partition::Test)
    }

    /// Observed ("tr") and held-out ("te") interactions of a validation or test partition. Row
    /// `i` of both matrices belongs to the same user; rows start at the smallest uid found in
    /// either table. Users without observed interactions are removed from both matrices.
    fn observed_and_heldout(&self, partition: Partition) -> Result<(SparseMatrix, SparseMatrix)> {

        if partition != Partition::Validation && partition != Partition::Test {
            return Err(Error::Reconstruction(
                format!("{} has no observed and held-out parts", partition)));
        }

        let tr_name = format!("{}_tr", partition.name());
        let te_name = format!("{}_te", partition.name());

        let tr_entries = self.entries(&self.read(&materialize::table_file(&tr_name))?, &tr_name)?;
        let te_entries = self.entries(&self.read(&materialize::table_file(&te_name))?, &te_name)?;

        let users = tr_entries.iter().chain(te_entries.iter()).map(|&(user, _, _)| user);
        let (start, end) = match (users.clone().min(), users.max()) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                let empty: SparseMatrix = TriMat::new((0, self.n_items)).to_csr();
                return Ok((empty.clone(), empty));
            },
        };
        let num_rows = (end - start) as usize + 1;

        let tr = self.to_matrix(&tr_entries, start, num_rows, &tr_name)?;
        let te = self.to_matrix(&te_entries, start, num_rows, &te_name)?;

        let has_observed: Vec<bool> = tr.outer_iterator().map(|row| row.nnz() > 0).collect();

        let num_dropped = has_observed.iter().filter(|keep| !**keep).count();
        if num_dropped > 0 {
            tracing::debug!("Dropping {} rows without observed interactions from {}.",
                num_dropped, partition);
        }

        Ok((select_rows(&tr, &has_observed), select_rows(&te, &has_observed)))
    }

    /// Training, validation and test interactions stacked on top of each other. The observed and
    /// held-out parts of validation and test users are added up.
    pub fn full(&self) -> Result<SparseMatrix> {
        let train = self.train()?;
        let (validation_tr, validation_te) = self.validation()?;
        let (test_tr, test_te) = self.test()?;

        let validation = &validation_tr + &validation_te;
        let test = &test_tr + &test_te;

        Ok(sprs::vstack(&[train.view(), validation.view(), test.view()]))
    }

    /// Persisted user ids, for mapping row indices back to external ids.
    pub fn user_ids(&self) -> Result<IdMap<String>> {
        let ids = io::read_ids(&self.proc_path.join(USER_IDS_FILE))?;
        Ok(IdMap::from_ordered(IdKind::User, ids))
    }

    /// Persisted item ids, for mapping column indices back to external ids.
    pub fn item_ids(&self) -> Result<IdMap<String>> {
        let ids = io::read_ids(&self.proc_path.join(ITEM_IDS_FILE))?;
        Ok(IdMap::from_ordered(IdKind::Item, ids))
    }

    fn read(&self, file: &str) -> Result<Table<u32>> {
        io::read_table(&self.proc_path.join(file))
    }

    fn entries(&self, table: &Table<u32>, name: &str) -> Result<Vec<(u32, u32, f64)>> {

        let mut entries = Vec::with_capacity(table.len());

        for row in &table.rows {
            let value = match self.mode {
                Mode::Implicit => 1.0,
                Mode::Explicit => {
                    let field = row.extra.first().ok_or_else(|| Error::Reconstruction(
                        format!("{} has no value column", name)))?;

                    field.trim().parse::<f64>().map_err(|_| Error::Reconstruction(
                        format!("'{}' in {} is not a numeric value", field, name)))?
                },
            };

            entries.push((row.user, row.item, value));
        }

        Ok(entries)
    }

    /// Builds a `num_rows x n_items` matrix with rows relative to `start`. Duplicate entries
    /// are summed up. Callers derive `start` and `num_rows` from the uids of `entries`, so only
    /// the item ids need checking.
    fn to_matrix(
        &self,
        entries: &[(u32, u32, f64)],
        start: u32,
        num_rows: usize,
        name: &str,
    ) -> Result<SparseMatrix> {

        let mut triplets = TriMat::with_capacity((num_rows, self.n_items), entries.len());

        for &(user, item, value) in entries {
            if item as usize >= self.n_items {
                return Err(Error::Reconstruction(
                    format!("iid {} in {} exceeds the {} known items", item, name, self.n_items)));
            }

            triplets.add_triplet((user - start) as usize, item as usize, value);
        }

        Ok(triplets.to_csr())
    }
}

/// Copies the rows of `matrix` flagged in `keep` into a new matrix.
fn select_rows(matrix: &SparseMatrix, keep: &[bool]) -> SparseMatrix {

    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut data = Vec::new();

    for (row, vector) in matrix.outer_iterator().enumerate() {
        if keep[row] {
            for (column, value) in vector.iter() {
                indices.push(column);
                data.push(*value);
            }
            indptr.push(indices.len());
        }
    }

    CsMat::new((indptr.len() - 1, matrix.cols()), indptr, indices, data)
}

/// All partitions of a processed directory, loaded at once.
pub struct Dataset {
    pub n_items: usize,
    pub train: SparseMatrix,
    pub validation: (SparseMatrix, SparseMatrix),
    pub test: (SparseMatrix, SparseMatrix),
}

impl Dataset {

    pub fn load(reader: &DataReader) -> Result<Self> {
        Ok(Dataset {
            n_items: reader.n_items(),
            train: reader.train()?,
            validation: reader.validation()?,
            test: reader.test()?,
        })
    }

    /// Everything a model may observe when scored on the test users: training rows, both parts
    /// of the validation rows and the observed test rows, stacked in this order. The held-out
    /// test interactions are returned alongside and line up with the last rows.
    pub fn train_and_test(&self) -> (SparseMatrix, SparseMatrix) {
        let validation = &self.validation.0 + &self.validation.1;

        let observed = sprs::vstack(&[self.train.view(), validation.view(), self.test.0.view()]);

        (observed, self.test.1.clone())
    }
}
