use std::process::ExitCode;

use fstree::TreeError;

mod app;
mod cli;
mod logging;
mod output;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            // Library failures keep their stable code; everything else is 1.
            let code = e.downcast_ref::<TreeError>().map_or(1, TreeError::code);
            ExitCode::from(code)
        }
    }
}
