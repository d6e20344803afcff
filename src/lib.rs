/*
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

//! Preprocessing of user-item interaction logs for top-N recommendation experiments.
//!
//! Raw interactions are filtered, users are split into disjoint train, validation and test
//! partitions, and the interactions of validation and test users are divided into an observed
//! and a held-out part. The results are persisted as CSV tables over contiguous integer ids,
//! which `DataReader` turns back into sparse user x item matrices.

pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod materialize;
pub mod pipeline;
pub mod reader;
pub mod split;
pub mod stats;
pub mod types;
pub mod utils;

mod usage_tests;

pub use config::DataConfig;
pub use error::{Error, Result};
pub use pipeline::{preprocess, Summary};
pub use reader::{DataReader, Dataset};
pub use types::{Loaded, Mode, Partition, SparseMatrix};
