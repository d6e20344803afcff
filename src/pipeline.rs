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

use std::time::Instant;

use fnv::FnvHashSet;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::config::DataConfig;
use crate::error::{IdKind, Result};
use crate::filter;
use crate::io;
use crate::materialize::{self, Splits};
use crate::split;
use crate::stats::IdMap;
use crate::utils;

/// What a preprocessing run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// Interactions left after thresholding and filtering.
    pub num_interactions: usize,
    /// Length of the persisted user id list.
    pub num_users: usize,
    /// Length of the persisted item id list, i.e. the number of distinct training items.
    pub num_items: usize,
    /// Rows written per table, in the order of `materialize::TABLE_NAMES`.
    pub rows_written: [usize; 5],
}

/// Runs the complete preprocessing: reads the raw interactions, filters them, splits users into
/// train, validation and test partitions, splits the interactions of validation and test users
/// into an observed and a held-out part, and persists everything to `config.proc_path`.
///
/// The user permutation and each of the two per-user splits draw from a generator freshly
/// seeded with `config.seed`, so repeated runs on the same input produce identical files.
pub fn preprocess(config: &DataConfig) -> Result<Summary> {

    let start = Instant::now();

    tracing::info!("Reading data file {}.", config.data_path.display());
    let mut raw_data = io::read_interactions(
        &config.data_path,
        config.delimiter(),
        config.header,
    )?;

    if let Some(threshold) = config.threshold() {
        raw_data = filter::apply_threshold(raw_data, threshold)?;
    }

    tracing::info!("Applying filtering.");
    let (data, user_activity, item_popularity) =
        filter::filter(raw_data, config.u_min, config.i_min);

    tracing::info!(
        "Found {} interactions between {} users and {} items.",
        data.len(),
        user_activity.len(),
        item_popularity.len(),
    );

    tracing::info!("Calculating splits.");
    let users: Vec<String> = user_activity.ids().map(String::from).collect();
    let mut rng = XorShiftRng::seed_from_u64(config.seed);
    let user_split = split::partition_users(users, config.heldout, &mut rng)?;

    let train_users: FnvHashSet<&str> = user_split.train.iter().map(String::as_str).collect();
    let train = data.retain_rows(|row| train_users.contains(row.user.as_str()));

    let items = IdMap::from_ordered(IdKind::Item, train.rows.iter().map(|row| row.item.clone()));

    tracing::info!("Creating validation and test set.");
    let policy = config.heldout_policy();

    let validation = split::heldout_interactions(
        &data, &user_split.validation, &items, policy.min_group_size());
    let test = split::heldout_interactions(
        &data, &user_split.test, &items, policy.min_group_size());

    let (validation_tr, validation_te) = split::split_train_test(
        &validation, policy, config.test_prop(), &mut XorShiftRng::seed_from_u64(config.seed));
    let (test_tr, test_te) = split::split_train_test(
        &test, policy, config.test_prop(), &mut XorShiftRng::seed_from_u64(config.seed));

    let num_train_users = user_split.train.len();
    let mut permuted_users = user_split.train;
    permuted_users.extend(user_split.validation);
    permuted_users.extend(user_split.test);

    if policy.prunes_unused_users() {
        let heldout_users: FnvHashSet<&str> = validation.rows.iter()
            .chain(test.rows.iter())
            .map(|row| row.user.as_str())
            .collect();

        let num_permuted = permuted_users.len();
        permuted_users = split::prune_unused_users(permuted_users, num_train_users, &heldout_users);

        tracing::debug!("Removed {} held-out users without usable interactions.",
            num_permuted - permuted_users.len());
    }

    let users = IdMap::from_ordered(IdKind::User, permuted_users);

    tracing::debug!(
        "{} training users, {} training items, {} validation and {} test interactions.",
        num_train_users, items.len(), validation.len(), test.len(),
    );

    let splits = Splits { train, validation_tr, validation_te, test_tr, test_te };
    let rows_written = materialize::write_splits(
        &config.proc_path, &splits, &users, &items, config.mode())?;

    tracing::info!("Preprocessing complete in {}ms!", utils::to_millis(start.elapsed()));

    Ok(Summary {
        num_interactions: data.len(),
        num_users: users.len(),
        num_items: items.len(),
        rows_written,
    })
}
