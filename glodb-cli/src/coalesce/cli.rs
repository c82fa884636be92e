use clap::{Command, arg};

pub const COALESCE_CMD: &str = "coalesce";

pub fn create_coalesce_cli() -> Command {
    Command::new(COALESCE_CMD)
        .about("Merge overlapping and adjacent intervals.")
        .arg(arg!(--input <BED> "Input BED file, - for stdin").required(true))
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
