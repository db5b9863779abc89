//! Database schema and queries

pub mod found;
pub mod init;
pub mod missing;

pub use found::*;
pub use init::*;
pub use missing::*;
