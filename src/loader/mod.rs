//! Text front ends that populate the `soc` models.

pub mod isa;
