//! Concrete [`crate::infra::codec::traits::Field`] implementations. `common`
//! holds the generic patterns shared by most categories (fractional
//! integers, packed bitfields, compound sub-FSPEC items); the per-category
//! modules hold the handful of items that don't fit those generic shapes.
pub mod cat021;
pub mod cat048;
pub mod common;
