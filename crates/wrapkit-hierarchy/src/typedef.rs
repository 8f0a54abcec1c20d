//! Typedef expansion and scoped name resolution

use wrapkit_ast::{BaseType, MethodDescriptor, TypeDesc};

use crate::names::{split_scope, strip_template_args};
use crate::{Database, Entity, EntityKind, HierarchyError};

/// Typedef chains longer than this are reported as cycles
const MAX_TYPEDEF_DEPTH: usize = 64;

impl Database {
    /// Replace a typedef'd user type in `value` by what it aliases, to a
    /// fixed point. Names are looked up in `scope` (a class name), its
    /// superclasses, then globally.
    ///
    /// Returns whether `value` changed. Names the database does not know
    /// are left untouched; names that turn out to be classes or enums get
    /// their base type filled in.
    pub fn expand_typedef(&self, value: &mut TypeDesc, scope: Option<&str>) -> Result<bool, HierarchyError> {
        let mut changed = false;
        let mut scope = scope.map(str::to_string);

        for _ in 0..MAX_TYPEDEF_DEPTH {
            let name = match (&value.base, &value.class_name) {
                (BaseType::Unknown | BaseType::Object, Some(name)) => name.clone(),
                _ => return Ok(changed),
            };
            let Some(entity) = self.find_in_scope(&name, scope.as_deref()) else {
                return Ok(changed);
            };

            match &entity.kind {
                EntityKind::Typedef { target } => {
                    tracing::trace!(alias = %name, typedef = %entity.name, "expanding typedef");
                    compose(value, target);
                    changed = true;
                    // The alias target is spelled relative to the typedef's own scope
                    if let (Some(owner), _) = split_scope(&entity.name) {
                        scope = Some(owner.to_string());
                    }
                }
                EntityKind::Class { .. } => {
                    if value.base == BaseType::Unknown {
                        value.base = BaseType::Object;
                        changed = true;
                    }
                    if strip_template_args(&name) != entity.name {
                        value.class_name = Some(qualify(&name, &entity.name));
                        changed = true;
                    }
                    return Ok(changed);
                }
                EntityKind::Enum => {
                    value.base = BaseType::Enum;
                    value.class_name = Some(entity.name.clone());
                    return Ok(true);
                }
            }
        }

        Err(HierarchyError::TypedefCycle {
            name: value.class_name.clone().unwrap_or_default(),
        })
    }

    /// Expand typedefs in every parameter and the return value of `method`
    pub fn expand_typedefs_in_method(
        &self,
        method: &mut MethodDescriptor,
        scope: Option<&str>,
    ) -> Result<bool, HierarchyError> {
        let mut changed = self.expand_typedef(&mut method.return_type, scope)?;
        for param in &mut method.params {
            changed |= self.expand_typedef(&mut param.ty, scope)?;
        }
        Ok(changed)
    }

    /// Fully qualified name of the enum `name` as seen from class `scope`
    pub fn qualified_enum_name(&self, scope: &str, name: &str) -> Option<String> {
        self.find_in_scope(name, Some(scope))
            .filter(|e| e.is_enum())
            .map(|e| e.name.clone())
    }

    /// Resolve `name` as written inside class `scope`: the class's own
    /// members first, then members of its superclasses (depth first), then
    /// the global scope. A leading `::` skips straight to global.
    pub fn find_in_scope(&self, name: &str, scope: Option<&str>) -> Option<&Entity> {
        if let Some(global) = name.strip_prefix("::") {
            return self.find_entry(global);
        }
        if let Some(scope) = scope {
            let mut visited = Vec::new();
            if let Some(found) = self.find_in_class_scope(name, scope, &mut visited) {
                return Some(found);
            }
        }
        self.find_entry(name)
    }

    fn find_in_class_scope(
        &self,
        name: &str,
        scope: &str,
        visited: &mut Vec<String>,
    ) -> Option<&Entity> {
        let scope = strip_template_args(scope);
        if visited.contains(&scope) {
            return None;
        }
        visited.push(scope.clone());

        if let Some(found) = self.find_entry(&format!("{scope}::{name}")) {
            return Some(found);
        }

        let class = self.find_entry(&scope)?;
        for sup in class.superclasses() {
            let index = match sup.cached_index() {
                Some(index) => index,
                None => match self.resolve_class(&sup.name) {
                    Some((index, _)) => index,
                    None => continue,
                },
            };
            let Some(parent) = self.get(index).map(|e| e.name.clone()) else {
                continue;
            };
            if let Some(found) = self.find_in_class_scope(name, &parent, visited) {
                return Some(found);
            }
        }
        None
    }
}

/// Compose an alias target into a value declared with that alias.
///
/// The target's pointers sit closer to the base type than the value's, and
/// the value's array dimensions are outermost.
fn compose(value: &mut TypeDesc, target: &TypeDesc) {
    let mut pointers = target.pointers.clone();
    pointers.append(&mut value.pointers);

    let mut dimensions = std::mem::take(&mut value.dimensions);
    dimensions.extend(target.dimensions.iter().cloned());

    value.base = target.base;
    value.class_name = target.class_name.clone();
    value.is_const |= target.is_const;
    value.is_reference |= target.is_reference;
    value.pointers = pointers;
    value.dimensions = dimensions;
    value.count = value.count.or(target.count);
}

/// Keep the template arguments of `written` on the qualified entity name
fn qualify(written: &str, qualified: &str) -> String {
    let (_, last) = split_scope(written);
    let args_at = last.find('<').unwrap_or(last.len());
    format!("{qualified}{}", &last[args_at..])
}
