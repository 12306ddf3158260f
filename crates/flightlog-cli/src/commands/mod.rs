//! Command implementations.

pub mod alias;
pub mod connections;
pub mod derive;
pub mod export;
pub mod import;
pub mod investigate;
pub mod search;
pub mod stats;

pub use self::alias::execute_alias;
pub use self::connections::execute_connections;
pub use self::derive::execute_derive;
pub use self::export::execute_export;
pub use self::import::execute_import;
pub use self::investigate::execute_investigate;
pub use self::search::execute_search;
pub use self::stats::execute_stats;
