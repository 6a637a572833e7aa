//! A modular framework for phased dispatch over instance sequences in Rust.
//!

pub use convoy_dispatch;
pub use convoy_system;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use convoy_dispatch::prelude::*;
    pub use convoy_system::prelude::*;
}
