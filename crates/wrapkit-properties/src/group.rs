//! Seeding and growing properties over the classified methods
//!
//! Seeding runs as ordered passes; each seed then claims every compatible
//! unclaimed method until nothing more attaches.

use wrapkit_ast::{MethodDescriptor, Visibility};
use wrapkit_hierarchy::Database;

use crate::value::unify;
use crate::{MethodInfo, MethodShape, PropertyDescriptor, ValueType};

/// One seeding pass: which unclaimed methods may start a new property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPass {
    Setters,
    Getters,
    CountSetters,
    CountGetters,
    Adders,
    /// Anything still recognized, e.g. a lone `XOn`/`XOff` pair
    Remaining,
}

impl SeedPass {
    /// Pass order decides which method seeds a property when several could
    pub const ORDER: [SeedPass; 6] = [
        SeedPass::Setters,
        SeedPass::Getters,
        SeedPass::CountSetters,
        SeedPass::CountGetters,
        SeedPass::Adders,
        SeedPass::Remaining,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SeedPass::Setters => "setters",
            SeedPass::Getters => "getters",
            SeedPass::CountSetters => "count-setters",
            SeedPass::CountGetters => "count-getters",
            SeedPass::Adders => "adders",
            SeedPass::Remaining => "remaining",
        }
    }

    fn seeds(&self, shape: MethodShape) -> bool {
        match self {
            SeedPass::Setters => MethodShape::ANY_SETTER.contains(shape),
            SeedPass::Getters => MethodShape::ANY_GETTER.contains(shape),
            SeedPass::CountSetters => shape == MethodShape::SET_NUM,
            SeedPass::CountGetters => shape == MethodShape::GET_NUM,
            SeedPass::Adders => MethodShape::ANY_ADD.contains(shape),
            SeedPass::Remaining => !shape.is_empty(),
        }
    }
}

pub(crate) struct Grouper<'a> {
    pub methods: &'a [MethodDescriptor],
    pub infos: &'a [MethodInfo],
    /// Shapes including those folded in from dropped repeats
    pub shapes: &'a [MethodShape],
    pub db: Option<&'a Database>,
}

impl<'a> Grouper<'a> {
    /// Group `candidates` (indices into `methods`, in declaration order).
    /// Returns the properties and, per method, the property it joined.
    pub fn group(&self, candidates: &[usize]) -> (Vec<PropertyDescriptor>, Vec<Option<usize>>) {
        let mut properties: Vec<PropertyDescriptor> = Vec::new();
        let mut owner: Vec<Option<usize>> = vec![None; self.methods.len()];
        let mut unclaimed: Vec<usize> = candidates.to_vec();

        for pass in SeedPass::ORDER {
            let mut pos = 0;
            while pos < unclaimed.len() {
                let seed = unclaimed[pos];
                if !pass.seeds(self.infos[seed].shape) {
                    pos += 1;
                    continue;
                }

                unclaimed.remove(pos);
                let index = properties.len();
                let mut property = PropertyDescriptor::new(&self.infos[seed].property);
                self.attach(&mut property, seed);
                owner[seed] = Some(index);
                tracing::trace!(property = %property.name, seed = %self.methods[seed].name, pass = pass.name(), "seeded property");

                // Grow to a fixed point: a newly attached method can type
                // the property and make further methods compatible
                loop {
                    let before = unclaimed.len();
                    unclaimed.retain(|&m| {
                        if self.compatible(&property, m) {
                            self.attach(&mut property, m);
                            owner[m] = Some(index);
                            false
                        } else {
                            true
                        }
                    });
                    if unclaimed.len() == before {
                        break;
                    }
                }

                property.finish();
                properties.push(property);
                // Growing may have claimed methods before `pos`
                pos = 0;
            }
        }

        (properties, owner)
    }

    fn compatible(&self, property: &PropertyDescriptor, m: usize) -> bool {
        let info = &self.infos[m];
        if info.property != property.name {
            return false;
        }
        let shape = info.shape;

        if MethodShape::NAME_ONLY.contains(shape) {
            return true;
        }
        if MethodShape::ANY_BOOL.contains(shape) || shape == MethodShape::ENUM_SET {
            return property.value.as_ref().map_or(true, ValueType::is_switchable);
        }
        match (&property.value, &info.value) {
            (None, _) | (_, None) => true,
            (Some(have), Some(value)) => unify(have, value, self.db),
        }
    }

    fn attach(&self, property: &mut PropertyDescriptor, m: usize) {
        let method = &self.methods[m];
        let info = &self.infos[m];
        let shape = self.shapes[m];

        match method.visibility {
            Visibility::Public => property.public_methods |= shape,
            Visibility::Protected => property.protected_methods |= shape,
            Visibility::Private => property.private_methods |= shape,
        }
        if method.is_legacy {
            property.legacy_methods |= shape;
        }
        if property.value.is_none() {
            property.value = info.value.clone();
        }
        if let Some(literal) = &info.enum_literal {
            if !property.enum_values.contains(literal) {
                property.enum_values.push(literal.clone());
            }
        }
        property.static_count += usize::from(method.is_static);
        property.methods.push(m);
    }
}
