//! Extracts parameters from `ArgMatches` and hands them to the build command.

use std::path::PathBuf;

use clap::ArgMatches;
use cmm_quads::Addressing;

use super::ColorChoice;
use crate::commands::build::BuildArgs;

pub struct BuildParams {
    pub source_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub addressing: Addressing,
    pub strict: bool,
    pub color: ColorChoice,
    pub verbosity: u8,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m
                .get_one::<PathBuf>("source_path")
                .cloned()
                .unwrap_or_default(),
            output_path: m.get_one::<PathBuf>("output_path").cloned(),
            addressing: m
                .get_one::<Addressing>("addressing")
                .copied()
                .unwrap_or_default(),
            strict: m.get_flag("strict"),
            color: m
                .get_one::<ColorChoice>("color")
                .copied()
                .unwrap_or_default(),
            verbosity: m.get_count("verbose"),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            source_path: p.source_path,
            output_path: p.output_path,
            addressing: p.addressing,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}
