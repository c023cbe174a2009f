//! `projgen formats` command.

use crate::emit::EmitterRegistry;

/// Execute the `formats` command: prints every registered backend.
pub fn run() {
    for format in EmitterRegistry::new().formats() {
        println!("{format}");
    }
}
