//! Data models

mod assignment;
mod benefit;
mod capability;
mod extension;
mod license;
mod machine;
mod report;

pub use assignment::*;
pub use benefit::*;
pub use capability::*;
pub use extension::*;
pub use license::*;
pub use machine::*;
pub use report::*;
