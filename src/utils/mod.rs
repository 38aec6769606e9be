//! Utility modules shared by the host pipeline and the feed plugin.

pub mod date;
pub mod git;
pub mod log;
pub mod xml;
