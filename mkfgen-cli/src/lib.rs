//! mkfgen CLI: `gen` builds `.mkf` source manifests, `proto` regenerates
//! protobuf bindings.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use mkfgen_core::manifest::{Manifest, ManifestConfig};
use mkfgen_core::output::{write_json_pretty, write_text, write_to_dir};
use mkfgen_core::proto::{find_schemas, ProtoLang, ProtocJob};

/// CLI entrypoint for mkfgen.
#[derive(Debug, Parser)]
#[command(
    name = "mkfgen",
    about = "Generate .mkf source manifests and regenerate protobuf bindings"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk a source tree and write its .mkf manifest
    Gen(GenArgs),
    /// Regenerate Java or C++ protobuf bindings from schema files
    Proto(ProtoArgs),
}

#[derive(Debug, Args)]
struct GenArgs {
    /// Root of the source tree to walk
    #[arg(value_hint = ValueHint::DirPath, default_value = ".")]
    root: PathBuf,

    /// Manifest file name (defaults to the root directory name + .mkf)
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Directory the manifest is written into
    #[arg(short = 'o', long = "out", value_hint = ValueHint::DirPath, default_value = ".")]
    out: PathBuf,

    /// Entries for the includepaths block
    #[arg(short = 'I', long = "includepath", value_hint = ValueHint::Other)]
    includepaths: Vec<String>,

    /// Entries for the defines block
    #[arg(short = 'D', long = "define", value_hint = ValueHint::Other)]
    defines: Vec<String>,

    /// Entries for the options block
    #[arg(long = "option", value_hint = ValueHint::Other, allow_hyphen_values = true)]
    options: Vec<String>,

    /// Entries for the subprojects block
    #[arg(long = "subproject", value_hint = ValueHint::Other)]
    subprojects: Vec<String>,

    /// Print the manifest text to stdout instead of writing a file
    #[arg(long = "stdout", action = ArgAction::SetTrue, conflicts_with = "json")]
    stdout: bool,

    /// Print the manifest as prettified JSON instead of writing a file
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct ProtoArgs {
    /// Schema files, or directories to scan for .proto files
    #[arg(value_hint = ValueHint::AnyPath, required = true)]
    schemas: Vec<PathBuf>,

    /// Output language for the generated bindings
    #[arg(short = 'l', long = "lang", value_enum)]
    lang: Lang,

    /// Import path handed to the compiler as --proto_path
    #[arg(short = 'I', long = "includepath", value_hint = ValueHint::DirPath, default_value = ".")]
    include: PathBuf,

    /// Directory the generated bindings are written into
    #[arg(short = 'o', long = "out", value_hint = ValueHint::DirPath, default_value = ".")]
    out: PathBuf,

    /// Protobuf compiler to invoke (overrides $PROTOC and the default `protoc`)
    #[arg(long = "protoc", value_hint = ValueHint::FilePath)]
    protoc: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Lang {
    Java,
    Cpp,
}

impl From<Lang> for ProtoLang {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Java => ProtoLang::Java,
            Lang::Cpp => ProtoLang::Cpp,
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Gen(args) => run_gen(args),
        Command::Proto(args) => run_proto(args),
    }
}

fn run_gen(args: GenArgs) -> Result<()> {
    let name = manifest_name(&args)?;
    let config = ManifestConfig::new(&args.root, name)?
        .with_defines(args.defines)
        .with_includepaths(args.includepaths)
        .with_options(args.options)
        .with_subprojects(args.subprojects);

    let manifest = Manifest::collect(config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.json {
        write_json_pretty(&manifest, &mut handle)?;
        writeln!(handle)?;
    } else if args.stdout {
        write_text(&manifest, &mut handle)?;
    } else {
        let dest = write_to_dir(&manifest, &args.out)?;
        writeln!(handle, "{}", dest.display())?;
    }

    Ok(())
}

fn run_proto(args: ProtoArgs) -> Result<()> {
    let schemas = gather_schemas(&args.schemas)?;

    let mut job = ProtocJob::new(args.lang.into(), &args.include, &args.out);
    if let Some(compiler) = &args.protoc {
        job = job.with_compiler(compiler);
    }

    for schema in &schemas {
        let renamed = job.run(schema)?;
        println!("{}", schema.display());
        for path in renamed {
            println!("  -> {}", path.display());
        }
    }

    Ok(())
}

/// Expand schema arguments: directories are scanned recursively, plain
/// files are taken as-is.
fn gather_schemas(raw: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut schemas = Vec::new();

    for path in raw {
        if path.is_dir() {
            schemas.extend(find_schemas(path)?);
        } else if path.is_file() {
            schemas.push(path.clone());
        } else {
            return Err(anyhow!("schema path does not exist: {}", path.display()));
        }
    }

    if schemas.is_empty() {
        return Err(anyhow!("no .proto schema files found"));
    }

    Ok(schemas)
}

fn manifest_name(args: &GenArgs) -> Result<String> {
    if let Some(name) = &args.name {
        return Ok(name.clone());
    }

    let canonical = args
        .root
        .canonicalize()
        .with_context(|| format!("resolving {}", args.root.display()))?;
    let stem = canonical
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| anyhow!("cannot derive a manifest name from {}", args.root.display()))?;

    Ok(format!("{stem}.mkf"))
}
