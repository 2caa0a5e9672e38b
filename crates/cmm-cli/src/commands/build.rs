use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cmm_compiler::emit::CallSiteRepair;
use cmm_compiler::{Compiler, Diagnostics, Error as CompileError};
use cmm_quads::Addressing;
use log::info;

pub const SOURCE_EXTENSION: &str = "cmm";
pub const MODULE_EXTENSION: &str = "rsk";

pub struct BuildArgs {
    pub source_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub addressing: Addressing,
    pub strict: bool,
    pub color: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("`{}` is not a .cmm file", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl BuildError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::UnsupportedExtension(_)
            | BuildError::Read { .. }
            | BuildError::Write { .. } => 1,
            BuildError::Compile(CompileError::Emit(_)) => 3,
            BuildError::Compile(_) => 2,
        }
    }
}

/// Where a module compiled from `source` is written by default.
pub fn output_path_for(source: &Path) -> Result<PathBuf, BuildError> {
    match source.extension() {
        Some(ext) if ext == SOURCE_EXTENSION => Ok(source.with_extension(MODULE_EXTENSION)),
        _ => Err(BuildError::UnsupportedExtension(source.to_path_buf())),
    }
}

/// Compiles `args.source_path` and writes the module.
///
/// Returns the written path and any warnings. Nothing is written on failure.
pub fn build(args: &BuildArgs, source: &str) -> Result<(PathBuf, Diagnostics), BuildError> {
    let default_output = output_path_for(&args.source_path)?;
    let output = args.output_path.clone().unwrap_or(default_output);

    let repair = if args.strict {
        CallSiteRepair::strict()
    } else {
        CallSiteRepair::default()
    };
    let compiled = Compiler::new(source)
        .with_addressing(args.addressing)
        .with_repair(repair)
        .compile()?;

    write_module(&output, &compiled.artifact.to_string()).map_err(|source| BuildError::Write {
        path: output.clone(),
        source,
    })?;
    info!(
        "wrote {} ({} unresolved calls, {} entry points)",
        output.display(),
        compiled.artifact.header.unimplemented.len(),
        compiled.artifact.header.implemented.len(),
    );

    Ok((output, compiled.diagnostics))
}

/// Write through a sibling temporary file so `path` only ever holds a
/// complete module.
fn write_module(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn read_source(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn run(args: BuildArgs) -> i32 {
    let path = args.source_path.display().to_string();

    let result = output_path_for(&args.source_path)
        .and_then(|_| read_source(&args.source_path))
        .and_then(|source| {
            let outcome = build(&args, &source);
            let diagnostics = match &outcome {
                Ok((_, warnings)) => Some(warnings),
                Err(BuildError::Compile(err)) => err.diagnostics(),
                Err(_) => None,
            };
            if let Some(diagnostics) = diagnostics.filter(|d| !d.is_empty()) {
                eprint!(
                    "{}",
                    diagnostics
                        .printer()
                        .source(&source)
                        .path(&path)
                        .colored(args.color)
                        .render()
                );
            }
            outcome
        });

    match result {
        Ok(_) => 0,
        Err(err) => {
            match &err {
                // Rendered above.
                BuildError::Compile(CompileError::ParseFailed(_))
                | BuildError::Compile(CompileError::AnalysisFailed(_)) => {}
                _ => eprintln!("error: {err}"),
            }
            err.exit_code()
        }
    }
}
