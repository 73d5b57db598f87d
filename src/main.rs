//! # media-sweep CLI
//!
//! Command-line interface for the media sweeper.
//!
//! ## Usage
//! ```bash
//! media-sweep scan ~/Pictures --duplicate-threshold 10
//! media-sweep scan ~/Pictures --output json
//! ```

mod cli;

use media_sweeper::Result;

fn main() -> Result<()> {
    cli::run()
}
