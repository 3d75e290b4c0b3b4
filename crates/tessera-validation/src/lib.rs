//! # tessera-validation
//!
//! Recursive validation of untyped input against tessera schemas. A single
//! pass produces the normalized value and an error tree mirroring the input;
//! validation failures are data, never errors.

pub mod error;
pub mod traits;
pub mod validator;
pub mod validators;

pub use error::{ErrorKey, ErrorTree, Outcome};
pub use traits::ValidationRule;
pub use validator::{validate, Validator};

// Built-in option validators
pub use validators::{
    bounds::BoundsValidator, custom::CustomValidator, membership::MembershipValidator,
    pattern::PatternValidator,
};
