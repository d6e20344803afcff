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

use std::env;
use std::process;

use getopts::Options;
use tracing_subscriber::EnvFilter;

use recoprep::{DataConfig, DataReader, Loaded, Partition};

fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recoprep=info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("c", "config", "Configuration file (required). A JSON document naming the \
        input file (data_path), the output directory (proc_path), the number of validation and \
        test users (heldout) and optional filtering and splitting settings.", "PATH");
    opts.optflag("r", "read", "Load all partitions back from the output directory after \
        preprocessing and report their shapes.");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    let config_path = match matches.opt_str("c") {
        Some(path) => path,
        None => {
            return print_usage_and_exit(
                &program,
                opts,
                Some("Please specify a configuration file via --config."),
            )
        },
    };

    if let Err(error) = run(&config_path, matches.opt_present("r")) {
        tracing::error!("{}", error);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
    process::exit(2);
}

fn run(config_path: &str, read_back: bool) -> recoprep::Result<()> {

    let config = DataConfig::from_path(config_path)?;

    let summary = recoprep::preprocess(&config)?;

    tracing::info!(
        "Wrote {} users and {} items, rows per table: {:?}",
        summary.num_users,
        summary.num_items,
        summary.rows_written,
    );

    if read_back {
        let reader = DataReader::new(&config)?;

        for partition in &[Partition::Train, Partition::Validation, Partition::Test] {
            match reader.load(*partition)? {
                Loaded::Single(matrix) => {
                    tracing::info!("{}: {:?}, {} entries", partition, matrix.shape(), matrix.nnz())
                },
                Loaded::Pair(tr, te) => {
                    tracing::info!("{}: observed {:?} with {} entries, held-out {:?} with {} \
                        entries", partition, tr.shape(), tr.nnz(), te.shape(), te.nnz())
                },
            }
        }
    }

    Ok(())
}
