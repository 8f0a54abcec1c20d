//! Type-precedence elimination
//!
//! Of two same-arity signatures, one is dropped when every parameter of the
//! other is identical or preferred by the host's coercion order: the
//! preferred signature type-checks first for every argument list the
//! dropped one would accept.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::trace;
use wrapkit_ast::{BaseType, MethodDescriptor, TypeDesc};

/// Why a signature left its overload group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationReason {
    /// Dominated by a preferred signature
    Precedence,
    /// Produced the same type-check string as an earlier signature
    DuplicateTypeCheck,
}

/// `a` preferred over `b` as a fundamental type
fn base_dominates(a: BaseType, b: BaseType) -> bool {
    match (a, b) {
        (BaseType::Double, BaseType::Float) => true,
        (BaseType::UnsignedChar, BaseType::SignedChar) => true,
        _ => {
            a.integer_rank().is_some_and(|rank| rank > 0)
                && a.integer_rank() == b.integer_rank()
                && !a.is_unsigned()
                && b.is_unsigned()
        }
    }
}

/// Compare one parameter position. `None` when the two can't be ordered,
/// which keeps both signatures.
pub fn compare_params(a: &TypeDesc, b: &TypeDesc) -> Option<Ordering> {
    match (a.is_string(), b.is_string()) {
        (true, false) if b.is_char_pointer() => return Some(Ordering::Greater),
        (false, true) if a.is_char_pointer() => return Some(Ordering::Less),
        _ => {}
    }
    if !a.same_shape(b) {
        return None;
    }
    if a.base == b.base && a.class_name == b.class_name {
        return Some(Ordering::Equal);
    }
    if base_dominates(a.base, b.base) {
        Some(Ordering::Greater)
    } else if base_dominates(b.base, a.base) {
        Some(Ordering::Less)
    } else {
        None
    }
}

/// Const qualifiers on the method and its parameters
fn constness(method: &MethodDescriptor) -> usize {
    usize::from(method.is_const) + method.params.iter().map(|p| p.ty.const_count()).sum::<usize>()
}

/// Whether `a` accepts every argument count `b` accepts
fn covers(a: &MethodDescriptor, b: &MethodDescriptor) -> bool {
    a.required_args() <= b.required_args() && a.max_args() >= b.max_args()
}

/// Compare two signatures. `Greater` means `a` makes `b` unreachable,
/// `Less` the reverse, `None` that both stay.
pub fn compare_signatures(a: &MethodDescriptor, b: &MethodDescriptor) -> Option<Ordering> {
    if a.params.len() != b.params.len() {
        return None;
    }

    let mut a_wins = false;
    let mut b_wins = false;
    for (pa, pb) in a.params.iter().zip(&b.params) {
        match compare_params(&pa.ty, &pb.ty)? {
            Ordering::Greater => a_wins = true,
            Ordering::Less => b_wins = true,
            Ordering::Equal => {}
        }
    }

    let order = match (a_wins, b_wins) {
        (true, true) => return None,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => constness(b)
            .cmp(&constness(a))
            .then_with(|| b.is_legacy.cmp(&a.is_legacy))
            .then(Ordering::Greater),
    };

    let winner_covers = match order {
        Ordering::Less => covers(b, a),
        _ => covers(a, b),
    };
    winner_covers.then_some(order)
}

/// For each signature, the index of the signature that eliminated it
pub fn eliminate(signatures: &[&MethodDescriptor]) -> Vec<Option<usize>> {
    let mut eliminated_by = vec![None; signatures.len()];

    for i in 0..signatures.len() {
        for j in i + 1..signatures.len() {
            if eliminated_by[i].is_some() {
                break;
            }
            if eliminated_by[j].is_some() {
                continue;
            }
            let (winner, loser) = match compare_signatures(signatures[i], signatures[j]) {
                Some(Ordering::Less) => (j, i),
                Some(_) => (i, j),
                None => continue,
            };
            trace!(
                name = %signatures[i].name,
                winner,
                loser,
                "overload eliminated by precedence"
            );
            eliminated_by[loser] = Some(winner);
        }
    }

    eliminated_by
}
