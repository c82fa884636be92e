mod cluster;
mod coalesce;
mod complement;
mod ops;
mod query;
mod utils;

use anyhow::Result;
use clap::{Command, arg};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "glodb";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Positional queries over genomic interval tracks: overlap, spacing and coordinate-level set operations on BED files.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Print debug output").global(true))
        .subcommand(ops::cli::create_ops_cli())
        .subcommand(complement::cli::create_complement_cli())
        .subcommand(coalesce::cli::create_coalesce_cli())
        .subcommand(cluster::cli::create_cluster_cli())
        .subcommand(query::cli::create_query_cli())
}

/// Log to stderr, filtered by RUST_LOG; `--verbose` raises the level to debug.
fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Info);
        }
    }
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // BINARY OPERATIONS
        //
        Some((ops::cli::OPS_CMD, matches)) => {
            ops::handlers::run_ops(matches)?;
        }

        //
        // COMPLEMENT
        //
        Some((complement::cli::COMPLEMENT_CMD, matches)) => {
            complement::handlers::run_complement(matches)?;
        }

        //
        // COALESCE
        //
        Some((coalesce::cli::COALESCE_CMD, matches)) => {
            coalesce::handlers::run_coalesce(matches)?;
        }

        //
        // CLUSTER
        //
        Some((cluster::cli::CLUSTER_CMD, matches)) => {
            cluster::handlers::run_cluster(matches)?;
        }

        //
        // QUERY PLANS
        //
        Some((query::cli::QUERY_CMD, matches)) => {
            query::handlers::run_query(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_ops_accepts_negative_spacing() {
        let matches = build_parser()
            .try_get_matches_from([
                "glodb", "ops", "-a", "a.bed", "-b", "b.bed", "--operator", "POS", "--min-pos",
                "-5", "--max-pos", "-1",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, ops::cli::OPS_CMD);
        assert_eq!(sub.get_one::<i64>("min-pos"), Some(&-5));
        assert_eq!(sub.get_one::<i64>("max-pos"), Some(&-1));
        assert_eq!(sub.get_one::<String>("BED_A").map(String::as_str), Some("a.bed"));
    }

    #[rstest]
    fn test_cluster_threshold_default() {
        let matches = build_parser()
            .try_get_matches_from(["glodb", "cluster", "--input", "a.bed", "--max-space", "10"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<usize>("threshold"), Some(&2));
    }

    #[rstest]
    fn test_subcommand_is_required() {
        assert!(build_parser().try_get_matches_from(["glodb"]).is_err());
    }
}
