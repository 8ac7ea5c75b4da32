//! Kernel utilities shared across features.
//! Keep this crate lightweight: layered config loading and the shared server plumbing
//! (API state, not-found fallback).
//!
//! ## Config loading
//! ```rust,no_run
//! use cwatch_kernel::config::load_config;
//! use cwatch_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server")).unwrap();
//! assert!(cfg.dataset.size > 0);
//! ```
pub mod config;
pub mod server;

pub use cwatch_domain as domain;
