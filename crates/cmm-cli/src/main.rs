mod cli;
mod commands;

use cli::{BuildParams, build_cli};

fn main() {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            // `--help` and `--version` come through here too.
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let params = BuildParams::from_matches(&matches);
    init_logging(params.verbosity);

    let code = commands::build::run(params.into());
    std::process::exit(code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
