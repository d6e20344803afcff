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

#[cfg(test)]
mod tests {

    use std::fs;
    use std::path::Path;

    use fnv::{FnvHashMap, FnvHashSet};

    use crate::config::DataConfig;
    use crate::error::Error;
    use crate::io;
    use crate::materialize::{table_file, ITEM_IDS_FILE, TABLE_NAMES, USER_IDS_FILE};
    use crate::pipeline::preprocess;
    use crate::reader::DataReader;
    use crate::types::{Mode, Table};

    fn config(data_path: &Path, proc_path: &Path, extra_settings: &str) -> DataConfig {
        let json = format!(
            r#"{{ "data_path": {:?}, "proc_path": {:?} {} }}"#,
            data_path.to_str().unwrap(),
            proc_path.to_str().unwrap(),
            extra_settings,
        );
        DataConfig::from_json_str(&json).unwrap()
    }

    /// 40 users with two to five interactions each, spread over 25 items.
    fn synthetic_interactions(path: &Path) {
        let mut lines = String::new();
        for user in 0..40 {
            for offset in 0..(2 + user % 4) {
                let item = (user * 3 + offset * 5) % 25;
                let rating = (user + offset) % 5 + 1;
                lines.push_str(&format!("user_{}\titem_{}\t{}\n", user, item, rating));
            }
        }
        fs::write(path, lines).unwrap();
    }

    fn table(dir: &Path, name: &str) -> Table<u32> {
        io::read_table(&dir.join(table_file(name))).unwrap()
    }

    fn count_per_user(table: &Table<u32>) -> FnvHashMap<u32, usize> {
        let mut counts = FnvHashMap::default();
        for row in &table.rows {
            *counts.entry(row.user).or_insert(0) += 1;
        }
        counts
    }

    fn users(table: &Table<u32>) -> FnvHashSet<u32> {
        table.rows.iter().map(|row| row.user).collect()
    }

    #[test]
    fn three_users_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.csv");
        let proc_path = dir.path().join("processed");

        let mut lines = String::from("user,item,rating\n");
        for user in &["A", "B", "C"] {
            for item in 1..=5 {
                lines.push_str(&format!("{},i{},{}\n", user, item, item));
            }
        }
        fs::write(&data_path, lines).unwrap();

        let config = config(&data_path, &proc_path, r#", "header": 0, "i_min": 0, "u_min": 0,
            "heldout": 1, "test_prop": 0.2, "seed": 42"#);

        let summary = preprocess(&config).unwrap();

        assert_eq!(summary.num_interactions, 15);
        assert_eq!(summary.num_users, 3);
        assert_eq!(summary.num_items, 5);
        assert_eq!(summary.rows_written, [5, 4, 1, 4, 1]);

        let train = fs::read_to_string(proc_path.join("train.csv")).unwrap();
        assert!(train.starts_with("uid,iid,rating\n0,0,1\n"));

        let reader = DataReader::new(&config).unwrap();
        assert_eq!(reader.n_items(), 5);

        let (validation_tr, validation_te) = reader.validation().unwrap();
        assert_eq!(validation_tr.shape(), (1, 5));
        assert_eq!(validation_tr.nnz(), 4);
        assert_eq!(validation_te.nnz(), 1);

        assert_eq!(reader.train().unwrap().shape(), (1, 5));
        assert_eq!(reader.full().unwrap().shape(), (3, 5));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.tsv");
        synthetic_interactions(&data_path);

        let settings = r#", "separator": "\t", "heldout": 6, "seed": 1234"#;
        let first = dir.path().join("first");
        let second = dir.path().join("second");

        preprocess(&config(&data_path, &first, settings)).unwrap();
        preprocess(&config(&data_path, &second, settings)).unwrap();

        let mut files: Vec<String> = TABLE_NAMES.iter().map(|name| table_file(name)).collect();
        files.push(USER_IDS_FILE.to_string());
        files.push(ITEM_IDS_FILE.to_string());

        for file in files {
            assert_eq!(
                fs::read(first.join(&file)).unwrap(),
                fs::read(second.join(&file)).unwrap(),
                "{} differs between runs", file
            );
        }

        let other_seed = dir.path().join("other_seed");
        preprocess(&config(&data_path, &other_seed,
            r#", "separator": "\t", "heldout": 6, "seed": 4321"#)).unwrap();

        assert_ne!(
            fs::read(first.join(USER_IDS_FILE)).unwrap(),
            fs::read(other_seed.join(USER_IDS_FILE)).unwrap(),
        );
    }

    #[test]
    fn partitions_are_disjoint_and_closed_over_training_items() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.tsv");
        let proc_path = dir.path().join("processed");
        synthetic_interactions(&data_path);

        let config = config(&data_path, &proc_path,
            r#", "separator": "\t", "heldout": 6, "seed": 7, "topn": true"#);
        let summary = preprocess(&config).unwrap();

        let train = table(&proc_path, "train");
        let training_items: FnvHashSet<u32> = train.rows.iter().map(|row| row.item).collect();
        assert_eq!(training_items.len(), summary.num_items);

        for name in &["validation_tr", "validation_te", "test_tr", "test_te"] {
            let heldout = table(&proc_path, name);
            assert_eq!(heldout.columns, vec!["uid", "iid"]);
            for row in &heldout.rows {
                assert!((row.item as usize) < summary.num_items);
                assert!(training_items.contains(&row.item));
                assert!((row.user as usize) < summary.num_users);
            }
        }

        let train_users = users(&train);
        let validation_users: FnvHashSet<u32> = users(&table(&proc_path, "validation_tr"))
            .union(&users(&table(&proc_path, "validation_te"))).cloned().collect();
        let test_users: FnvHashSet<u32> = users(&table(&proc_path, "test_tr"))
            .union(&users(&table(&proc_path, "test_te"))).cloned().collect();

        assert!(train_users.is_disjoint(&validation_users));
        assert!(train_users.is_disjoint(&test_users));
        assert!(validation_users.is_disjoint(&test_users));

        // every persisted user id carries data
        assert_eq!(
            train_users.len() + validation_users.len() + test_users.len(),
            summary.num_users,
        );
    }

    #[test]
    fn heldout_users_are_conserved_and_proportional() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.tsv");
        let proc_path = dir.path().join("processed");
        synthetic_interactions(&data_path);

        let config = config(&data_path, &proc_path,
            r#", "separator": "\t", "heldout": 8, "seed": 99, "test_prop": 0.5"#);
        preprocess(&config).unwrap();

        let reader = DataReader::new(&config).unwrap();
        let user_ids = reader.user_ids().unwrap();
        let item_ids = reader.item_ids().unwrap();

        let raw = io::read_interactions(&data_path, b'\t', None).unwrap();

        for partition in &["validation", "test"] {
            let observed = count_per_user(&table(&proc_path, &format!("{}_tr", partition)));
            let heldout = count_per_user(&table(&proc_path, &format!("{}_te", partition)));

            assert_eq!(
                observed.keys().collect::<FnvHashSet<_>>(),
                heldout.keys().collect::<FnvHashSet<_>>(),
            );

            for (user, num_heldout) in &heldout {
                let name = user_ids.name(*user).unwrap();
                let num_interactions = raw.rows.iter()
                    .filter(|row| &row.user == name && item_ids.contains(row.item.as_str()))
                    .count();

                assert!(num_interactions >= 2);
                assert_eq!(observed[user] + num_heldout, num_interactions);
                assert_eq!(*num_heldout, ((num_interactions as f64 * 0.5) as usize).max(1));
            }
        }

        for (tr, te) in vec![reader.validation().unwrap(), reader.test().unwrap()] {
            assert_eq!(tr.shape(), te.shape());
            for row in tr.outer_iterator() {
                assert!(row.nnz() > 0);
            }
        }
    }

    #[test]
    fn per_user_threshold_variant() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.tsv");
        let proc_path = dir.path().join("processed");
        synthetic_interactions(&data_path);

        let config = config(&data_path, &proc_path,
            r#", "separator": "\t", "heldout": 8, "seed": 5, "test_prop": 0.5,
               "min_i_train": 4"#);
        let summary = preprocess(&config).unwrap();

        // users are never pruned from the id list in this variant
        assert_eq!(summary.num_users, 40);

        for partition in &["validation", "test"] {
            let observed = count_per_user(&table(&proc_path, &format!("{}_tr", partition)));
            let heldout = count_per_user(&table(&proc_path, &format!("{}_te", partition)));

            for (user, num_observed) in &observed {
                let num_heldout = heldout.get(user).cloned().unwrap_or(0);
                let num_interactions = num_observed + num_heldout;

                let expected = if num_interactions >= 4 { num_interactions / 2 } else { 0 };
                assert_eq!(num_heldout, expected);
            }
        }

        let reader = DataReader::from_dir(&proc_path, Mode::Implicit).unwrap();
        let (tr, te) = reader.test().unwrap();
        assert_eq!(tr.shape(), te.shape());
    }

    #[test]
    fn filtering_thresholds_apply_before_splitting() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.tsv");
        let proc_path = dir.path().join("processed");
        synthetic_interactions(&data_path);

        let config = config(&data_path, &proc_path,
            r#", "separator": "\t", "heldout": 3, "u_min": 4, "threshold": 1.0"#);
        let summary = preprocess(&config).unwrap();

        let raw = io::read_interactions(&data_path, b'\t', None).unwrap();
        let above_threshold = raw.rows.iter().filter(|row| row.extra[0] != "1").count();

        assert!(summary.num_interactions < above_threshold);
        for (_, count) in count_per_user(&table(&proc_path, "train")) {
            assert!(count >= 4);
        }
    }

    #[test]
    fn zero_threshold_keeps_valueless_and_non_positive_interactions() {
        let dir = tempfile::tempdir().unwrap();
        let proc_path = dir.path().join("processed");

        let mut implicit_lines = String::new();
        let mut rated_lines = String::new();
        for user in &["A", "B", "C"] {
            for item in 1..=5 {
                implicit_lines.push_str(&format!("{},i{}\n", user, item));
                rated_lines.push_str(&format!("{},i{},{}\n", user, item, -(item % 2)));
            }
        }

        for (file, lines) in &[("implicit.csv", implicit_lines), ("rated.csv", rated_lines)] {
            let data_path = dir.path().join(file);
            fs::write(&data_path, lines).unwrap();

            let config = config(&data_path, &proc_path,
                r#", "heldout": 1, "seed": 42, "threshold": 0.0, "topn": true"#);
            let summary = preprocess(&config).unwrap();

            assert_eq!(summary.num_interactions, 15);
            assert_eq!(summary.rows_written, [5, 4, 1, 4, 1]);
        }
    }

    #[test]
    fn non_numeric_values_are_reported_by_interaction() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("ratings.csv");
        let proc_path = dir.path().join("processed");
        fs::write(&data_path, "exported today\nuser,item,rating\nA,i1,4\nA,i2,n/a\n").unwrap();

        let config = config(&data_path, &proc_path,
            r#", "header": 1, "heldout": 1, "threshold": 3.5"#);

        match preprocess(&config) {
            Err(Error::NonNumericValue { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected a non-numeric value, got {:?}", other),
        }
        assert!(!proc_path.exists());
    }

    #[test]
    fn input_errors_leave_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let proc_path = dir.path().join("processed");

        let missing = config(&dir.path().join("missing.csv"), &proc_path, r#", "heldout": 1"#);
        assert!(matches!(preprocess(&missing), Err(Error::MissingInput(_))));
        assert!(!proc_path.exists());

        let data_path = dir.path().join("tiny.csv");
        fs::write(&data_path, "a,x\nb,x\n").unwrap();
        let tiny = config(&data_path, &proc_path, r#", "heldout": 1"#);
        assert!(matches!(preprocess(&tiny), Err(Error::NotEnoughUsers { users: 2, heldout: 1 })));
        assert!(!proc_path.exists());
    }
}
