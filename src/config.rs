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

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

use crate::error::{Error, Result};
use crate::split::HeldoutPolicy;
use crate::types::Mode;

const DEFAULT_TEST_PROP: f64 = 0.2;

/// Settings for a preprocessing run and for reading its results back, loaded from a JSON
/// document such as
///
/// ```json
/// { "data_path": "ratings.csv", "proc_path": "processed", "heldout": 500, "u_min": 5 }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub data_path: PathBuf,
    #[serde(default)]
    pub separator: Option<String>,
    /// Row index of the column header in the raw file, `None` if it has no header.
    #[serde(default)]
    pub header: Option<usize>,
    #[serde(default)]
    pub seed: u64,
    /// Only interactions whose value (third column) exceeds this threshold are kept.
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub i_min: usize,
    #[serde(default)]
    pub u_min: usize,
    pub heldout: usize,
    #[serde(default)]
    pub test_prop: Option<f64>,
    pub proc_path: PathBuf,
    #[serde(default)]
    pub topn: bool,
    /// Selects per-user thresholding for the held-out split when present.
    #[serde(default)]
    pub min_i_train: Option<usize>,
}

impl DataConfig {

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Config(format!("{} is not a configuration file", path.display())));
        }

        let config: DataConfig = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DataConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(ref separator) = self.separator {
            if separator.len() != 1 {
                return Err(Error::Config(
                    format!("separator must be a single byte, got '{}'", separator)));
            }
        }

        let test_prop = self.test_prop();
        if !(test_prop > 0.0 && test_prop <= 1.0) {
            return Err(Error::Config(format!("test_prop must lie in (0, 1], got {}", test_prop)));
        }

        if let Some(threshold) = self.threshold {
            if threshold.is_nan() {
                return Err(Error::Config("threshold must be a number".to_string()));
            }
        }

        Ok(())
    }

    pub fn delimiter(&self) -> u8 {
        self.separator.as_ref()
            .and_then(|separator| separator.bytes().next())
            .unwrap_or(b',')
    }

    pub fn test_prop(&self) -> f64 {
        self.test_prop.unwrap_or(DEFAULT_TEST_PROP)
    }

    /// The value threshold to apply, a threshold of zero disables the filter.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold.filter(|threshold| *threshold != 0.0)
    }

    pub fn mode(&self) -> Mode {
        if self.topn { Mode::Implicit } else { Mode::Explicit }
    }

    pub fn heldout_policy(&self) -> HeldoutPolicy {
        match self.min_i_train {
            Some(min_i_train) => HeldoutPolicy::MinInteractions { min_i_train },
            None => HeldoutPolicy::AtLeastOne,
        }
    }
}
