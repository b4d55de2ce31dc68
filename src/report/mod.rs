pub mod interaction;
pub use interaction::*;

pub mod evaluation_report;
pub use evaluation_report::*;
