//! weft - git-backed issue tracker
//!
//! Issue data is committed to its own branch inside the host repository.
//! Non-invasive design: no hooks installed, no daemon, no background
//! processes.

use weft::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
