//! Tweet history: recording posted words and looking them up by date.

pub mod actions;
pub mod body;
pub mod models;
pub mod reference_dates;

pub use actions::*;
pub use body::*;
pub use models::*;
pub use reference_dates::*;
