//! # photo-import CLI
//!
//! Command-line interface for the import core.
//!
//! ## Usage
//! ```bash
//! photo-import hash IMG_0001.jpg IMG_0002.jpg
//! photo-import inspect IMG_0001.jpg --output json
//! photo-import import ~/Card/DCIM/*.JPG --verbose
//! ```

mod cli;

use photo_import_core::Result;

fn main() -> Result<()> {
    photo_import_core::init_tracing();
    cli::run()
}
