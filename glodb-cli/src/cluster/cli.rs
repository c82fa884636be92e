use clap::{Command, arg, value_parser};

pub const CLUSTER_CMD: &str = "cluster";

pub fn create_cluster_cli() -> Command {
    Command::new(CLUSTER_CMD)
        .about("Collapse runs of nearby intervals into spanning intervals.")
        .arg(arg!(--input <BED> "Input BED file, - for stdin").required(true))
        .arg(
            arg!(--"max-space" <MAX_SPACE> "Largest gap allowed inside a cluster")
                .required(true)
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--threshold <THRESHOLD> "Fewest intervals a cluster must hold")
                .required(false)
                .value_parser(value_parser!(usize))
                .default_value("2"),
        )
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
