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

use std::path::PathBuf;

use thiserror::Error;

/// Which id map a failed lookup was run against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    User,
    Item,
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            IdKind::User => f.write_str("user"),
            IdKind::Item => f.write_str("item"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("input file {0} does not exist")]
    MissingInput(PathBuf),

    #[error("malformed input in line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("interaction {row} has no numeric value to compare against threshold {threshold}")]
    NonNumericValue { row: usize, threshold: f64 },

    #[error("{kind} id '{id}' is not part of the {kind} vocabulary")]
    UnknownId { kind: IdKind, id: String },

    #[error("cannot hold out 2 x {heldout} users from only {users} users")]
    NotEnoughUsers { users: usize, heldout: usize },

    #[error("cannot reconstruct matrix: {0}")]
    Reconstruction(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
