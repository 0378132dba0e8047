use std::rc::Rc;
use std::{env, process};

use launchkit::cli::output;
use launchkit::exitcode;
use launchkit::infrastructure::logging::{init_logging, quiet_panics, DEFAULT_BASE_LEVEL};
use launchkit::Launcher;

mod hello;

fn main() {
    let levels = match init_logging(DEFAULT_BASE_LEVEL) {
        Ok(levels) => Rc::new(levels),
        Err(e) => {
            output::error(&e);
            process::exit(exitcode::INTERNAL_ERROR);
        }
    };

    quiet_panics();

    let registry = match hello::registry(levels) {
        Ok(registry) => registry,
        Err(e) => {
            output::error(&e);
            process::exit(exitcode::INTERNAL_ERROR);
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    process::exit(Launcher::new(registry).launch(&args));
}
