//! Low-level numeric kernels.
//!
//! # Kernels
//!
//! - [`running_stat`]: Welford's algorithm for numerically stable mean and
//!   sample variance, with a sliding-window driver that handles partial
//!   windows and flat windows exactly.

pub mod running_stat;

pub use running_stat::{trailing_stats, RunningStat, WindowStats};
