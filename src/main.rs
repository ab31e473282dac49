//! # bst-dedup CLI
//!
//! Command-line interface for the duplicate tree finder.
//!
//! ## Usage
//! ```bash
//! bst-dedup --input coarse.txt --hash-workers 8 --comp-workers 4
//! bst-dedup --input fine.txt --hash-workers 8 --data-workers 2 --output json
//! ```

mod cli;

use bst_dedup::Result;

fn main() -> Result<()> {
    bst_dedup::init_tracing();
    cli::run()
}
