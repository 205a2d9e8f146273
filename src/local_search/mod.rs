//! Local search operators for facility sets.
//!
//! - [`SwapSearch`] — first-improvement single swaps with delta evaluation

mod swap;

pub use swap::{swap_improve, SwapSearch};
