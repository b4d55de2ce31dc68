pub mod session_error;
pub use session_error::*;

pub mod turn;
pub use turn::*;

pub mod session;
pub use session::*;

pub mod aggregate_report;
pub use aggregate_report::*;

pub mod session_manager;
pub use session_manager::*;

pub mod session_store;
pub use session_store::*;
