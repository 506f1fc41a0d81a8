//! # Scholaris CLI
//!
//! Offline inspection of the permission catalogue and role templates, and the
//! one database operation the API deliberately does not offer: creating the
//! first super admin.
//!
//! ## Usage
//!
//! ```ignore
//! use scholaris_cli::catalog;
//!
//! print!("{}", catalog::render_category("library"));
//! ```

pub mod admin;
pub mod catalog;
