//! Binary entrypoint for mkfgen-cli.

fn main() {
    if let Err(err) = mkfgen_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
