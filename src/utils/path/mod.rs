//! Path and URL utilities.
//!
//! Pure functions, no filesystem access.
//!
//! - [`route`]: URL utilities (`is_external_link`, `normalize_relative`, `join_url`)

pub mod route;
