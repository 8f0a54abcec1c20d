//! wrapkit-properties: property synthesis
//!
//! Recognizes accessor families (`GetX`/`SetX`, `XOn`/`XOff`,
//! `SetXToLiteral`, `GetNumberOfXs`, `AddX`/`RemoveX`, ...) in a class's
//! method list and groups them into properties:
//! 1. Classify every method's shape from its name and signature
//! 2. Drop repeated accessors in favor of the most precise one
//! 3. Seed properties in a fixed pass order and grow each to a fixed point

mod classify;
mod group;
mod precedence;
mod shape;
mod synth;
mod value;

pub use classify::{classify_method, MethodInfo};
pub use group::SeedPass;
pub use shape::MethodShape;
pub use synth::{
    ClassProperties, MethodReport, PropertyDescriptor, PropertyDiagnostic, PropertyOptions,
    PropertySynthesizer,
};
pub use value::{bases_unify, unify, ValueType};
