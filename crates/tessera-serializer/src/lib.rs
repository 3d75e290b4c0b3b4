//! # tessera-serializer
//!
//! Normalizes values into the canonical output shape a schema declares.
//! Private fields and fields whose condition fails are left out; every other
//! declared field is always present.

pub mod serializer;

pub use serializer::{serialize, Serializer};
