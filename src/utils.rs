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

use std::cmp::Ordering;
use std::time::Duration;

pub fn to_millis(duration: Duration) -> u64 {
    (duration.as_secs() * 1_000) + u64::from(duration.subsec_millis())
}

/// Total order on external ids: ids that both look like integers are compared numerically (so
/// that "2" comes before "10"), everything else lexicographically. Integers sort before
/// non-integers.
pub fn compare_ids(id_a: &str, id_b: &str) -> Ordering {
    match (id_a.parse::<i64>(), id_b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| id_a.cmp(id_b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => id_a.cmp(id_b),
    }
}
