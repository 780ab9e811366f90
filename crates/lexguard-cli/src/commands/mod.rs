//! Command implementations.

pub mod analyze;
pub mod audit;
pub mod import;

pub use self::analyze::execute_analyze;
pub use self::audit::execute_audit;
pub use self::import::execute_import;
