//! wrapkit-overload: overload resolution and dispatch planning
//!
//! Turns the same-named methods of a class into one dynamic entry point:
//! 1. Filter out methods the binding layer can't express
//! 2. Group by name, in declaration order
//! 3. Drop signatures made unreachable by the host's coercion order
//! 4. Map each argument count to its signature, marking collisions
//! 5. Give every signature a type-check string for the runtime matcher

mod doc;
mod eliminate;
mod error;
mod plan;
mod settings;
mod typecheck;
mod wrappable;

pub use doc::{group_doc, signature_doc};
pub use eliminate::{compare_params, compare_signatures, eliminate, EliminationReason};
pub use error::{DispatchError, Unwrappable};
pub use plan::{
    plan_class, ArgSlot, ClassPlan, DispatchKind, DispatchPlan, Eliminated, OverloadGroup,
    Signature, Skipped,
};
pub use settings::OverloadSettings;
pub use typecheck::{base_code, type_check_string, ArgKind, ParamCheck, TypeCheck};
pub use wrappable::check_wrappable;
