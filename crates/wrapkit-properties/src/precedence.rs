//! Precedence between same-named accessors of the same kind
//!
//! When a class declares, say, both `SetPoint(float[3])` and
//! `SetPoint(double[3])`, only one should drive the property. The loser is
//! kept in the report as a repeat of the winner, and its shape is folded
//! into the winner's.

use std::cmp::Ordering;

use wrapkit_ast::{BaseType, MethodDescriptor};

use crate::{MethodInfo, MethodShape};

/// Outcome of duplicate resolution, indexed like the class's methods
#[derive(Debug, Clone, Default)]
pub(crate) struct Repeats {
    /// Winner that replaced each dropped method
    pub repeat_of: Vec<Option<usize>>,
    /// Methods kept side by side because nothing told them apart
    pub ambiguous: Vec<bool>,
    /// Shapes folded onto each winner from the methods it replaced
    pub merged: Vec<MethodShape>,
}

/// The family a shape belongs to for duplicate detection: getters
/// compete with getters, setters with setters
fn family(shape: MethodShape) -> MethodShape {
    [
        MethodShape::ANY_GETTER,
        MethodShape::ANY_SETTER,
        MethodShape::ANY_ADD,
    ]
    .into_iter()
    .find(|group| group.contains(shape))
    .unwrap_or(shape)
}

/// Whether two accessors compete: the same shape, or shapes of one family
/// carrying the same number of elements of different types
fn same_shaped(a: &MethodInfo, b: &MethodInfo) -> bool {
    if a.shape == b.shape {
        return true;
    }
    if family(a.shape) != family(b.shape) {
        return false;
    }
    match (&a.value, &b.value) {
        (Some(va), Some(vb)) => va.count == vb.count && va.base != vb.base,
        _ => false,
    }
}

/// `Greater` when `a` should be kept over `b`, `Equal` when undecided
fn prefer(a: (&MethodDescriptor, &MethodInfo), b: (&MethodDescriptor, &MethodInfo)) -> Ordering {
    let (ma, ia) = a;
    let (mb, ib) = b;

    if let (Some(va), Some(vb)) = (&ia.value, &ib.value) {
        match (va.base, vb.base) {
            (BaseType::Double, BaseType::Float) => return Ordering::Greater,
            (BaseType::Float, BaseType::Double) => return Ordering::Less,
            _ => {}
        }
        if va.base == vb.base {
            match (va.count, vb.count) {
                (Some(ca), Some(cb)) if ca != cb => return ca.cmp(&cb),
                _ => {}
            }
        }
    }

    match (ma.is_legacy, mb.is_legacy) {
        (false, true) => return Ordering::Greater,
        (true, false) => return Ordering::Less,
        _ => {}
    }

    let constness = |m: &MethodDescriptor| {
        usize::from(m.is_const)
            + m.return_type.const_count()
            + m.params.iter().map(|p| p.ty.const_count()).sum::<usize>()
    };
    constness(mb).cmp(&constness(ma))
}

/// Resolve duplicate accessors among `methods`, considering only the
/// indices in `candidates`
pub(crate) fn resolve_repeats(
    methods: &[MethodDescriptor],
    infos: &[MethodInfo],
    candidates: &[usize],
) -> Repeats {
    let n = methods.len();
    let mut repeats = Repeats {
        repeat_of: vec![None; n],
        ambiguous: vec![false; n],
        merged: infos.iter().map(|i| i.shape).collect(),
    };

    for (pos, &i) in candidates.iter().enumerate() {
        if repeats.repeat_of[i].is_some() || !infos[i].is_recognized() {
            continue;
        }
        for &j in &candidates[pos + 1..] {
            if repeats.repeat_of[j].is_some()
                || methods[i].name != methods[j].name
                || infos[i].property != infos[j].property
                || !same_shaped(&infos[i], &infos[j])
            {
                continue;
            }

            let (winner, loser) = match prefer((&methods[i], &infos[i]), (&methods[j], &infos[j])) {
                Ordering::Greater => (i, j),
                Ordering::Less => (j, i),
                Ordering::Equal => {
                    tracing::trace!(method = %methods[i].name, "indistinguishable duplicates");
                    repeats.ambiguous[i] = true;
                    repeats.ambiguous[j] = true;
                    continue;
                }
            };

            tracing::trace!(method = %methods[i].name, winner, loser, "dropping repeated accessor");
            let folded = repeats.merged[loser];
            repeats.merged[winner] |= folded;
            repeats.repeat_of[loser] = Some(winner);
            for other in repeats.repeat_of.iter_mut() {
                if *other == Some(loser) {
                    *other = Some(winner);
                }
            }
            if loser == i {
                break;
            }
        }
    }

    repeats
}
