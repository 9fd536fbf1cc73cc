//! Local search for polishing final tours.
//!
//! - [`two_opt_improve`]: Intra-tour 2-opt edge reversal

mod two_opt;

pub use two_opt::two_opt_improve;
