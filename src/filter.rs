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

use crate::error::{Error, Result};
use crate::stats::Counts;
use crate::types::Table;

/// Keeps the interactions whose value (the third column) is strictly greater than `threshold`.
/// Failures report the one-based position of the interaction among the data rows, header rows
/// are not counted.
pub fn apply_threshold(data: Table<String>, threshold: f64) -> Result<Table<String>> {

    let Table { columns, rows } = data;
    let mut retained = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let value = row.extra.first()
            .and_then(|value| value.trim().parse::<f64>().ok())
            .ok_or_else(|| Error::NonNumericValue { row: index + 1, threshold })?;

        if value > threshold {
            retained.push(row);
        }
    }

    Ok(Table::new(columns, retained))
}

/// Drops items with fewer than `min_i` interactions, then users with fewer than `min_u`
/// interactions in what remains. A threshold of zero disables that step.
///
/// This is a single pass: pruning users afterwards can push an item below `min_i` again, which
/// is NOT corrected. Only the user threshold is guaranteed to hold on the result. The returned
/// counts are computed on the returned table.
pub fn filter(data: Table<String>, min_u: usize, min_i: usize) -> (Table<String>, Counts, Counts) {

    let mut data = data;

    if min_i > 0 {
        let item_counts = Counts::of_items(&data.rows);
        data.rows.retain(|row| item_counts.get(&row.item).unwrap_or(0) >= min_i);
    }

    if min_u > 0 {
        let user_counts = Counts::of_users(&data.rows);
        data.rows.retain(|row| user_counts.get(&row.user).unwrap_or(0) >= min_u);
    }

    let user_activity = Counts::of_users(&data.rows);
    let item_popularity = Counts::of_items(&data.rows);

    (data, user_activity, item_popularity)
}
