//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    match uniroute_cli::run() {
        Ok(()) => {}
        Err(uniroute_cli::CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("uniroute: {err}");
            std::process::exit(1);
        }
    }
}
