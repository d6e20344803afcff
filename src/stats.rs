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

use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;

use fnv::FnvHashMap;

use crate::error::{Error, IdKind, Result};
use crate::types::Row;
use crate::utils;

/// Number of interactions per distinct user (user activity) or item (item popularity), ordered
/// by id.
#[derive(Clone, Debug, PartialEq)]
pub struct Counts {
    entries: Vec<(String, usize)>,
}

impl Counts {

    pub fn of_users(rows: &[Row<String>]) -> Self {
        Counts::count(rows.iter().map(|row| row.user.as_str()))
    }

    pub fn of_items(rows: &[Row<String>]) -> Self {
        Counts::count(rows.iter().map(|row| row.item.as_str()))
    }

    fn count<'a, I>(ids: I) -> Self where I: Iterator<Item=&'a str> {

        let mut counts: FnvHashMap<&str, usize> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        for id in ids {
            *counts.entry(id).or_insert(0) += 1;
        }

        let mut entries: Vec<(String, usize)> = counts.into_iter()
            .map(|(id, count)| (id.to_string(), count))
            .collect();

        entries.sort_by(|(id_a, _), (id_b, _)| utils::compare_ids(id_a, id_b));

        Counts { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|(other, _)| utils::compare_ids(other, id))
            .ok()
            .map(|position| self.entries[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str, usize)> {
        self.entries.iter().map(|(id, count)| (id.as_str(), *count))
    }

    /// Distinct ids in id order.
    pub fn ids(&self) -> impl Iterator<Item=&str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn min(&self) -> Option<usize> {
        self.entries.iter().map(|(_, count)| *count).min()
    }
}

/// Bijection between external ids and contiguous zero-based indices. The index of an id is its
/// position in the order the ids were first offered.
#[derive(Clone, Debug)]
pub struct IdMap<K> where K: Hash + Eq {
    kind: IdKind,
    ids: Vec<K>,
    indices: FnvHashMap<K, u32>,
}

impl<K> IdMap<K> where K: Hash + Eq + Clone {

    /// Assigns indices in iteration order; repeated ids keep the index of their first occurrence.
    pub fn from_ordered<I>(kind: IdKind, ids: I) -> Self where I: IntoIterator<Item=K> {

        let mut index: u32 = 0;
        let mut ordered_ids = Vec::new();
        let mut indices: FnvHashMap<K, u32> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        for id in ids {
            if !indices.contains_key(&id) {
                indices.insert(id.clone(), index);
                ordered_ids.push(id);
                index += 1;
            }
        }

        IdMap { kind, ids: ordered_ids, indices }
    }

    pub fn kind(&self) -> IdKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in index order.
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    pub fn contains<Q>(&self, id: &Q) -> bool where K: Borrow<Q>, Q: Hash + Eq + ?Sized {
        self.indices.contains_key(id)
    }

    /// Looks up the index of `id`, failing with `Error::UnknownId` for ids outside the map.
    pub fn index<Q>(&self, id: &Q) -> Result<u32>
        where K: Borrow<Q>, Q: Hash + Eq + Display + ?Sized {

        self.indices.get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownId { kind: self.kind, id: id.to_string() })
    }

    /// The external id behind an index.
    pub fn name(&self, index: u32) -> Option<&K> {
        self.ids.get(index as usize)
    }
}

impl IdMap<u32> {

    /// Maps every index in `0..len` onto itself, used to re-map already numerized tables.
    pub fn identity(kind: IdKind, len: u32) -> Self {
        IdMap::from_ordered(kind, 0..len)
    }
}
