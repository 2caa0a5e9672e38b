//! Argument builders for `cmmc`.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};
use cmm_quads::Addressing;

use super::ColorChoice;

/// Source file to compile (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("C-- source file (.cmm)")
}

/// Output file (-o/--output).
pub fn output_path_arg() -> Arg {
    Arg::new("output_path")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the module (defaults to SOURCE with a .rsk extension)")
}

/// Header address convention (--addressing).
pub fn addressing_arg() -> Arg {
    Arg::new("addressing")
        .long("addressing")
        .value_name("MODE")
        .default_value("file")
        .value_parser(str::parse::<Addressing>)
        .help("Count header addresses from the top of the file or from the first instruction")
}

/// Disable call site repair (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Fail on any call site that is not exactly where it was recorded")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(value_parser!(ColorChoice))
        .help("Colorize diagnostics")
}

/// Log verbosity (-v, repeatable).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log more (-v info, -vv debug, -vvv trace)")
}
