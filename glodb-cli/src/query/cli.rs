use clap::{Command, arg};

pub const QUERY_CMD: &str = "query";

pub fn create_query_cli() -> Command {
    Command::new(QUERY_CMD)
        .about("Evaluate a TOML query plan.")
        .arg(arg!(--plan <PLAN> "Query plan (.toml)").required(true))
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
