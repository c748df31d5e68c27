//! punchsync main entrypoint.

use punchsync::run;
use punchsync::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
