//! # Storefront Entry Point
//!
//! ```text
//! main.rs ────► storefront::run()
//!                 ├── logging (stderr)
//!                 ├── configuration
//!                 ├── database + migrations
//!                 └── one command → JSON envelope on stdout
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront::run().await
}
