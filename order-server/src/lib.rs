//! Self-order platform - order server
//!
//! Guests scan a table QR code, open an anonymous session, place orders
//! and pay; the kitchen drives each order through its lifecycle and the
//! counter hands it over against a short pickup token.
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/        # Config, state, server, background tasks
//! ├── db/          # Embedded redb database
//! ├── directory/   # Tenants, tables, menu items
//! ├── guest/       # Guest session store and sweep
//! ├── orders/      # Order aggregate, lifecycle, payments, pickup tokens
//! ├── auth/        # Guest and staff middleware
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # Error types, logger
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod directory;
pub mod guest;
pub mod orders;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use orders::{OrderError, OrderStorage, OrdersManager};
pub use utils::{AppError, AppResult};

pub fn print_banner() {
    println!(
        r#"
   ____          __
  / __ \_______/ /__  _____
 / / / / ___/ __  / _ \/ ___/
/ /_/ / /  / /_/ /  __/ /
\____/_/   \__,_/\___/_/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}

/// Load `.env` and initialize logging before anything else runs.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.as_deref(),
    );
    Ok(())
}
