//! Bazaar Server - multi-vendor storefront backend
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SurrealDB storage, models and repositories
//! - **Authentication** (`auth`): JWT validation plus the role/ownership gate
//! - **Order lifecycle** (`orders`): checkout, stock reservation, status
//!   transitions and parent-order aggregation
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, state, server shell
//! ├── auth/          # JWT, middleware, access gate
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order lifecycle engine
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderLifecycle, aggregate_status};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____
   / __ )____ _____  ____ _____ _____
  / __  / __ `/_  / / __ `/ __ `/ ___/
 / /_/ / /_/ / / /_/ /_/ / /_/ / /
/_____/\__,_/ /___/\__,_/\__,_/_/
    "#
    );
}
