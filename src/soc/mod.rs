//! Target-side data models.

pub mod isa;
