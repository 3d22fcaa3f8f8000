use clap::Parser;
use stocksignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    stocksignal::logging::init();
    run(Cli::parse())
}
