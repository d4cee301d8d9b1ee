//! API route modules.

pub mod lists;
pub mod session;
