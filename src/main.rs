use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use labelgen::{Args, Outcome, TerminalPreview};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut preview = TerminalPreview::new(!args.no_preview);

    match labelgen::run(&args, &mut preview, Path::new(".")) {
        Ok(Outcome::Saved(path)) => {
            log::debug!("wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Aborted) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
