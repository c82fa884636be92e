use clap::{Arg, Command, arg, value_parser};

pub const OPS_CMD: &str = "ops";

pub fn create_ops_cli() -> Command {
    Command::new(OPS_CMD)
        .about("Combine two BED files with one operator.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("BED_A")
                .short('a')
                .required(true)
                .help("Left BED file, - for stdin"),
        )
        .arg(
            Arg::new("BED_B")
                .short('b')
                .required(true)
                .help("Right BED file"),
        )
        .arg(
            arg!(--operator <OPERATOR> "POS, AND, OR, MINUS, sAND, sMINUS, bAND (&&), bOR (||) or bMINUS (-)")
                .required(true),
        )
        .arg(
            arg!(--"min-pos" <MIN_POS> "Smallest gap between a left end and a right start (POS only)")
                .required(false)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .default_value("0"),
        )
        .arg(
            arg!(--"max-pos" <MAX_POS> "Largest gap between a left end and a right start (POS only)")
                .required(false)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
