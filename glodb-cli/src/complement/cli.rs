use clap::{Arg, Command, arg};

pub const COMPLEMENT_CMD: &str = "complement";

pub fn create_complement_cli() -> Command {
    Command::new(COMPLEMENT_CMD)
        .about("Report the stretches of each sequence not covered by a BED file.")
        .arg(arg!(--input <BED> "Input BED file, - for stdin").required(true))
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .required(true)
                .help("Path to chrom.sizes file"),
        )
        .arg(arg!(--strict "Fail instead of reporting nothing when intervals run past a sequence end"))
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
