use clap::Command;

use super::args::*;

/// Build the `cmmc` command.
pub fn build_cli() -> Command {
    Command::new("cmmc")
        .about("Compile a C-- source file into a linkable quad module")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(
            r#"EXAMPLES:
  cmmc main.cmm                      # writes main.rsk
  cmmc main.cmm -o build/main.rsk
  cmmc lib.cmm --addressing stream   # for linkers counting from the first instruction
  RUST_LOG=cmm_compiler=trace cmmc main.cmm"#,
        )
        .arg(source_path_arg())
        .arg(output_path_arg())
        .arg(addressing_arg())
        .arg(strict_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}
