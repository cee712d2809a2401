//! `jotter` binary: interactive notebook in the current directory.

use jotter_cli::Session;
use jotter_core::{init_logging, JotterConfig, NoteStore};
use log::error;
use std::io;
use std::path::PathBuf;

fn main() {
    let base = std::env::current_dir().unwrap_or_else(|err| {
        eprintln!("warning: cannot resolve current directory: {err}");
        PathBuf::from(".")
    });
    let config = JotterConfig::for_dir(&base);
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let (store, load_error) = NoteStore::load_or_empty(&config.data_file);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), store);

    let reported = match load_error {
        Some(err) => session.report_load_error(&err),
        None => Ok(()),
    };
    if let Err(err) = reported.and_then(|()| session.run()) {
        error!("event=session_end module=cli status=error error={}", err);
        eprintln!("terminal error: {err}");
    }
}
