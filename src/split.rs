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

use fnv::{FnvHashMap, FnvHashSet};
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::error::{Error, Result};
use crate::stats::{Counts, IdMap};
use crate::types::Table;

/// How many interactions of a validation or test user are held out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldoutPolicy {
    /// Every evaluation user holds out at least one interaction; users with a single
    /// interaction are skipped, and users with fewer than two interactions on the training
    /// vocabulary never make it into a held-out partition.
    AtLeastOne,
    /// Users with at least `min_i_train` interactions hold out a `test_prop` share of them
    /// (possibly none), all other users keep all their interactions on the observed side.
    MinInteractions { min_i_train: usize },
}

impl HeldoutPolicy {

    /// Size of the held-out slice for a user with `num_interactions` interactions, `None` if
    /// the user must be skipped.
    pub fn heldout_size(&self, num_interactions: usize, test_prop: f64) -> Option<usize> {
        let proportional = (test_prop * num_interactions as f64) as usize;

        match *self {
            HeldoutPolicy::AtLeastOne => {
                if num_interactions > 1 {
                    Some(proportional.max(1).min(num_interactions))
                } else {
                    None
                }
            },
            HeldoutPolicy::MinInteractions { min_i_train } => {
                if num_interactions >= min_i_train {
                    Some(proportional.min(num_interactions))
                } else {
                    Some(0)
                }
            },
        }
    }

    /// Minimum number of interactions on the training vocabulary a held-out user needs to stay
    /// in its partition.
    pub fn min_group_size(&self) -> usize {
        match *self {
            HeldoutPolicy::AtLeastOne => 2,
            HeldoutPolicy::MinInteractions { .. } => 0,
        }
    }

    /// Whether held-out users without usable interactions are dropped from the user ids.
    pub fn prunes_unused_users(&self) -> bool {
        *self == HeldoutPolicy::AtLeastOne
    }
}

/// Disjoint user groups. Concatenating train, validation and test gives the permuted users.
#[derive(Clone, Debug, PartialEq)]
pub struct UserSplit<K> {
    pub train: Vec<K>,
    pub validation: Vec<K>,
    pub test: Vec<K>,
}

/// Shuffles `users` and slices off `heldout` validation and `heldout` test users from the end,
/// the remaining users form the training partition.
pub fn partition_users<K, R>(users: Vec<K>, heldout: usize, rng: &mut R) -> Result<UserSplit<K>>
    where R: Rng + ?Sized {

    let num_users = users.len();

    if 2 * heldout >= num_users {
        return Err(Error::NotEnoughUsers { users: num_users, heldout });
    }

    let mut train = users;
    train.shuffle(rng);

    let mut validation = train.split_off(num_users - 2 * heldout);
    let test = validation.split_off(heldout);

    Ok(UserSplit { train, validation, test })
}

/// Interactions of `users` on items of the training `vocabulary`. Users left with fewer than
/// `min_group_size` such interactions are dropped as a whole.
pub fn heldout_interactions(
    data: &Table<String>,
    users: &[String],
    vocabulary: &IdMap<String>,
    min_group_size: usize,
) -> Table<String> {

    let users: FnvHashSet<&str> = users.iter().map(String::as_str).collect();

    let restricted = data.retain_rows(|row| {
        users.contains(row.user.as_str()) && vocabulary.contains(row.item.as_str())
    });

    if min_group_size == 0 {
        return restricted;
    }

    let counts = Counts::of_users(&restricted.rows);

    let mut data = restricted;
    data.rows.retain(|row| counts.get(&row.user).unwrap_or(0) >= min_group_size);
    data
}

/// Splits the interactions of each user into an observed ("tr") and a held-out ("te") part,
/// choosing the held-out interactions uniformly at random without replacement. Users are
/// processed in id order, and both parts keep the input order of a user's interactions.
pub fn split_train_test<R>(
    data: &Table<String>,
    policy: HeldoutPolicy,
    test_prop: f64,
    rng: &mut R,
) -> (Table<String>, Table<String>)
    where R: Rng + ?Sized {

    let mut rows_per_user: FnvHashMap<&str, Vec<usize>> =
        FnvHashMap::with_capacity_and_hasher(100, Default::default());

    for (position, row) in data.rows.iter().enumerate() {
        rows_per_user.entry(row.user.as_str()).or_insert_with(Vec::new).push(position);
    }

    let users = Counts::of_users(&data.rows);

    let mut observed = Vec::with_capacity(data.len());
    let mut heldout = Vec::new();
    let mut num_skipped = 0;

    for user in users.ids() {
        let positions = &rows_per_user[user];
        let num_interactions = positions.len();

        match policy.heldout_size(num_interactions, test_prop) {
            Some(size) => {
                let mut is_heldout = vec![false; num_interactions];
                for chosen in index::sample(rng, num_interactions, size).into_iter() {
                    is_heldout[chosen] = true;
                }

                for (offset, position) in positions.iter().enumerate() {
                    let row = data.rows[*position].clone();
                    if is_heldout[offset] { heldout.push(row) } else { observed.push(row) }
                }
            },
            None => {
                tracing::warn!("Skipped user {} in held-out set: number of interactions <= 1.",
                    user);
                num_skipped += 1;
            },
        }
    }

    tracing::debug!("Split {} users into {} observed and {} held-out interactions, skipped {}.",
        users.len(), observed.len(), heldout.len(), num_skipped);

    (Table::new(data.columns.clone(), observed), Table::new(data.columns.clone(), heldout))
}

/// Removes the users past the training slice of `permuted_users` which do not occur in
/// `heldout_users`, so that no user id is left without interactions.
pub fn prune_unused_users(
    permuted_users: Vec<String>,
    num_train_users: usize,
    heldout_users: &FnvHashSet<&str>,
) -> Vec<String> {

    let unused: FnvHashSet<String> = permuted_users[num_train_users..].iter()
        .filter(|user| !heldout_users.contains(user.as_str()))
        .cloned()
        .collect();

    permuted_users.into_iter()
        .filter(|user| !unused.contains(user))
        .collect()
}
