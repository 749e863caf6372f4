//! # Reply Formatting
//!
//! Post-processing applied to model replies before they are shown or stored.

pub mod reveal;
pub mod schedule;
