//! Overload groups and their dispatch plans

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace, warn};
use wrapkit_ast::{ClassDescriptor, MethodDescriptor};
use wrapkit_hierarchy::Database;

use crate::doc::{group_doc, signature_doc};
use crate::eliminate::{eliminate, EliminationReason};
use crate::typecheck::{type_check_string, ArgKind, TypeCheck};
use crate::{check_wrappable, DispatchError, OverloadSettings, Unwrappable};

/// One entry of the arg-count map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "signatures", rename_all = "snake_case")]
pub enum ArgSlot {
    /// No signature takes this many arguments
    Empty,
    /// Exactly one signature does
    Unique(usize),
    /// Several do; the runtime matcher decides
    Collision(Vec<usize>),
}

impl ArgSlot {
    fn claim(&mut self, signature: usize) {
        *self = match std::mem::replace(self, ArgSlot::Empty) {
            ArgSlot::Empty => ArgSlot::Unique(signature),
            ArgSlot::Unique(first) => ArgSlot::Collision(vec![first, signature]),
            ArgSlot::Collision(mut all) => {
                all.push(signature);
                ArgSlot::Collision(all)
            }
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// One signature: arity check, then call
    Direct,
    /// Several signatures: arg-count fast path, type-check fallback
    Master,
}

/// Everything an emitter needs to route one dynamic call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPlan {
    pub function: String,
    pub kind: DispatchKind,
    /// Indexed by supplied argument count
    pub arg_map: Vec<ArgSlot>,
    /// Type-check string per signature, in declaration order
    pub checks: Vec<String>,
    #[serde(skip)]
    ranges: Vec<(usize, usize)>,
}

impl DispatchPlan {
    pub fn new(function: impl Into<String>, signatures: &[Signature]) -> Self {
        let largest = signatures.iter().map(|s| s.max).max().unwrap_or(0);
        let mut arg_map = vec![ArgSlot::Empty; largest + 1];
        for (i, signature) in signatures.iter().enumerate() {
            for slot in &mut arg_map[signature.required..=signature.max] {
                slot.claim(i);
            }
        }

        Self {
            function: function.into(),
            kind: if signatures.len() == 1 {
                DispatchKind::Direct
            } else {
                DispatchKind::Master
            },
            arg_map,
            checks: signatures.iter().map(|s| s.type_check.clone()).collect(),
            ranges: signatures.iter().map(|s| (s.required, s.max)).collect(),
        }
    }

    /// Argument counts with more than one candidate
    pub fn collisions(&self) -> impl Iterator<Item = usize> + '_ {
        self.arg_map
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, ArgSlot::Collision(_)))
            .map(|(count, _)| count)
    }

    /// Route a call without class ancestry; object arguments must name
    /// the parameter's class exactly
    pub fn select(&self, args: &[ArgKind]) -> Result<usize, DispatchError> {
        self.select_with(args, None)
    }

    /// Route a call: the signature index that would be invoked
    pub fn select_with(&self, args: &[ArgKind], db: Option<&Database>) -> Result<usize, DispatchError> {
        match self.arg_map.get(args.len()) {
            Some(ArgSlot::Unique(i)) => Ok(*i),
            Some(ArgSlot::Collision(candidates)) => candidates
                .iter()
                .copied()
                .find(|&i| TypeCheck::parse(&self.checks[i]).matches(args, db))
                .ok_or_else(|| DispatchError::NoMatch {
                    function: self.function.clone(),
                    received: args.len(),
                }),
            Some(ArgSlot::Empty) | None => Err(DispatchError::Arity {
                function: self.function.clone(),
                expected: self.expected(),
                received: args.len(),
            }),
        }
    }

    fn expected(&self) -> String {
        let min = self.ranges.iter().map(|r| r.0).min().unwrap_or(0);
        let max = self.ranges.iter().map(|r| r.1).max().unwrap_or(0);
        if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        }
    }
}

/// A signature that survived elimination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// Index into the class's method list
    pub method: usize,
    pub descriptor: MethodDescriptor,
    pub type_check: String,
    pub required: usize,
    pub max: usize,
    pub doc: String,
}

/// A signature removed from its group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Eliminated {
    pub method: usize,
    /// Method index of the signature that made this one unreachable
    pub by: usize,
    pub reason: EliminationReason,
}

/// Methods sharing one name, and how calls to that name are dispatched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverloadGroup {
    pub name: String,
    pub signatures: Vec<Signature>,
    pub eliminated: Vec<Eliminated>,
    pub all_static: bool,
    pub all_legacy: bool,
    pub is_constructor: bool,
    pub doc: String,
    pub plan: DispatchPlan,
}

impl OverloadGroup {
    /// Plan one group. `methods` pairs each method with its index in the
    /// class, in declaration order.
    pub fn plan(name: &str, methods: &[(usize, MethodDescriptor)], is_constructor: bool) -> Self {
        let descriptors: Vec<&MethodDescriptor> = methods.iter().map(|(_, m)| m).collect();
        let eliminated_by = eliminate(&descriptors);

        let mut signatures: Vec<Signature> = Vec::new();
        let mut eliminated = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (pos, (index, method)) in methods.iter().enumerate() {
            if let Some(winner) = eliminated_by[pos] {
                eliminated.push(Eliminated {
                    method: *index,
                    by: methods[winner].0,
                    reason: EliminationReason::Precedence,
                });
                continue;
            }

            let bound = !is_constructor && !method.is_static;
            let type_check = type_check_string(method, bound);
            if let Some(&earlier) = seen.get(&type_check) {
                warn!(
                    group = name,
                    type_check = %type_check,
                    method = *index,
                    "dropping overload with duplicate type-check string"
                );
                eliminated.push(Eliminated {
                    method: *index,
                    by: earlier,
                    reason: EliminationReason::DuplicateTypeCheck,
                });
                continue;
            }
            seen.insert(type_check.clone(), *index);

            trace!(group = name, type_check = %type_check, "signature kept");
            signatures.push(Signature {
                method: *index,
                descriptor: method.clone(),
                type_check,
                required: method.required_args(),
                max: method.max_args(),
                doc: signature_doc(method),
            });
        }

        let plan = DispatchPlan::new(name, &signatures);
        Self {
            name: name.to_string(),
            all_static: signatures.iter().all(|s| s.descriptor.is_static),
            all_legacy: signatures.iter().all(|s| s.descriptor.is_legacy),
            is_constructor,
            doc: group_doc(signatures.iter().map(|s| &s.descriptor)),
            signatures,
            eliminated,
            plan,
        }
    }
}

/// A method that was left out, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub method: usize,
    pub name: String,
    pub reason: Unwrappable,
}

/// Dispatch plans for every wrappable method name of one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassPlan {
    pub class_name: String,
    pub groups: Vec<OverloadGroup>,
    pub skipped: Vec<Skipped>,
}

impl ClassPlan {
    pub fn group(&self, name: &str) -> Option<&OverloadGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Filter, group, eliminate, and plan every method of a class
pub fn plan_class(class: &ClassDescriptor, db: Option<&Database>, settings: &OverloadSettings) -> ClassPlan {
    let mut order: Vec<(String, Vec<(usize, MethodDescriptor)>)> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    let mut skipped = Vec::new();

    for (index, method) in class.methods.iter().enumerate() {
        let mut method = method.clone();
        if let Some(db) = db {
            if let Err(err) = db.expand_typedefs_in_method(&mut method, Some(&class.name)) {
                warn!(class = %class.name, method = %method.name, error = %err, "typedef expansion failed");
            }
        }

        let verdict = if class.is_constructor(&method) && (!settings.constructors || class.is_abstract) {
            Err(Unwrappable::Constructor)
        } else {
            check_wrappable(&method, db, settings)
        };
        if let Err(reason) = verdict {
            trace!(class = %class.name, method = %method.name, %reason, "method skipped");
            skipped.push(Skipped {
                method: index,
                name: method.name.clone(),
                reason,
            });
            continue;
        }

        let slot = *by_name.entry(class.methods[index].name.as_str()).or_insert_with(|| {
            order.push((method.name.clone(), Vec::new()));
            order.len() - 1
        });
        order[slot].1.push((index, method));
    }

    let groups: Vec<OverloadGroup> = order
        .iter()
        .map(|(name, methods)| {
            let is_constructor = *name == class.name;
            OverloadGroup::plan(name, methods, is_constructor)
        })
        .collect();

    debug!(
        class = %class.name,
        groups = groups.len(),
        skipped = skipped.len(),
        "class planned"
    );
    ClassPlan {
        class_name: class.name.clone(),
        groups,
        skipped,
    }
}
