//! Ancestry queries with template argument substitution
//!
//! Superclass positions are memoized in each [`SuperClass`] slot the first
//! time they are resolved, unless which entity the superclass names depends
//! on the template arguments of the instantiation being queried.
//!
//! [`SuperClass`]: crate::SuperClass

use crate::names::{decompose_templated_type, key_depends_on, strip_template_args, substitute_identifiers};
use crate::{Database, Entity, EntityKind};

/// Alias chains longer than this are treated as cycles
const MAX_ALIAS_HOPS: usize = 32;

impl Database {
    /// Whether `entry` (instantiated as `class_with_args`) is `target` or
    /// derives from it.
    ///
    /// Returns the matching ancestor as it is instantiated along the path,
    /// e.g. `Base<int>` for `Derived<int>` when `Derived<T> : Base<T>`.
    /// Unresolvable superclasses are simply not ancestors.
    pub fn is_type_of(&self, entry: &Entity, target: &str, class_with_args: &str) -> Option<String> {
        let target = strip_template_args(target);
        let mut path = Vec::new();
        self.type_of_inner(entry, &target, class_with_args, &mut path)
    }

    fn type_of_inner<'a>(
        &'a self,
        entry: &'a Entity,
        target: &str,
        class_with_args: &str,
        path: &mut Vec<&'a str>,
    ) -> Option<String> {
        if entry.name == target {
            return Some(class_with_args.to_string());
        }
        if path.contains(&entry.name.as_str()) {
            tracing::trace!(class = %entry.name, "inheritance cycle, not an ancestor");
            return None;
        }
        path.push(&entry.name);

        let params = entry.template_params();
        let param_names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        let args = decompose_templated_type(class_with_args, &entry.name, params);

        for sup in entry.superclasses() {
            let super_name = match &args {
                Some(args) => substitute_identifiers(&sup.name, &param_names, args),
                None => sup.name.clone(),
            };

            let resolved = match sup.cached_index() {
                Some(index) => {
                    tracing::trace!(class = %entry.name, superclass = %sup.name, "superclass cache hit");
                    let effective = if strip_template_args(&super_name) == self.entities[index].name {
                        super_name
                    } else {
                        // Cached through an alias: recover the aliased spelling
                        match self.resolve_class(&super_name) {
                            Some((_, name)) => name,
                            None => continue,
                        }
                    };
                    (index, effective)
                }
                None => {
                    let Some((index, effective)) = self.resolve_class(&super_name) else {
                        continue;
                    };
                    // Judged on the name as declared: if its key mentions no
                    // template parameter, no substitution can change it either
                    if !key_depends_on(&sup.name, params) {
                        sup.remember(index);
                    }
                    (index, effective)
                }
            };

            let (index, effective) = resolved;
            let ancestor = &self.entities[index];
            if let Some(found) = self.type_of_inner(ancestor, target, &effective, path) {
                path.pop();
                return Some(found);
            }
        }

        path.pop();
        None
    }

    /// [`Database::is_type_of`] starting from a class name
    pub fn is_a(&self, class_with_args: &str, target: &str) -> Option<String> {
        let (index, effective) = self.resolve_class(class_with_args)?;
        self.is_type_of(&self.entities[index], target, &effective)
    }

    /// The `index`-th superclass of `entry` with the arguments of
    /// `class_with_args` substituted for its template parameters
    pub fn templated_superclass(
        &self,
        entry: &Entity,
        class_with_args: &str,
        index: usize,
    ) -> Option<String> {
        let sup = entry.superclasses().get(index)?;
        let params = entry.template_params();
        match decompose_templated_type(class_with_args, &entry.name, params) {
            Some(args) => {
                let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
                Some(substitute_identifiers(&sup.name, &names, &args))
            }
            None => Some(sup.name.clone()),
        }
    }

    /// Follow typedef aliases from `name` to a class entity.
    ///
    /// Returns the class position and the name it is reached by, with the
    /// template arguments of the final alias target.
    pub fn resolve_class(&self, name: &str) -> Option<(usize, String)> {
        let mut current = name.trim().to_string();
        for _ in 0..MAX_ALIAS_HOPS {
            let index = self.find_index(&current)?;
            match &self.entities[index].kind {
                EntityKind::Class { .. } => return Some((index, current)),
                EntityKind::Typedef { target } => {
                    if target.indirection() > 0 || target.is_reference {
                        return None;
                    }
                    current = target.class_name.clone()?;
                }
                EntityKind::Enum => return None,
            }
        }
        tracing::debug!(alias = name, "typedef alias chain does not terminate");
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::DatabaseBuilder;

    fn make_db(text: &str) -> crate::Database {
        let mut builder = DatabaseBuilder::new();
        builder.load_str("test.txt", text).unwrap();
        builder.build()
    }

    #[test]
    fn test_self_match() {
        let db = make_db("A ; A.h ; M\n");
        let a = db.find_entry("A").unwrap();
        assert_eq!(db.is_type_of(a, "A", "A").as_deref(), Some("A"));
    }

    #[test]
    fn test_single_inheritance() {
        let db = make_db("A ; A.h ; M\nB : A ; B.h ; M\nC ; C.h ; M\n");
        let b = db.find_entry("B").unwrap();
        assert_eq!(db.is_type_of(b, "A", "B").as_deref(), Some("A"));
        assert_eq!(db.is_type_of(b, "C", "B"), None);
    }

    #[test]
    fn test_template_substitution() {
        let db = make_db("Base<class T> ; Base.h ; M\nDerived<class T> : Base<T> ; Derived.h ; M\n");
        let derived = db.find_entry("Derived").unwrap();
        assert_eq!(
            db.is_type_of(derived, "Base", "Derived<int>").as_deref(),
            Some("Base<int>")
        );
        assert_eq!(
            db.is_type_of(derived, "Base", "Derived<double>").as_deref(),
            Some("Base<double>")
        );
        // `Base<T>` always names `Base`, so its slot is cached
        assert!(derived.superclasses()[0].cached_index().is_some());
    }

    #[test]
    fn test_parameter_superclass_not_cached() {
        let db = make_db("A ; A.h ; M\nB ; B.h ; M\nMixin<class T> : T ; Mixin.h ; M\n");
        let mixin = db.find_entry("Mixin").unwrap();
        assert_eq!(db.is_type_of(mixin, "A", "Mixin<A>").as_deref(), Some("A"));
        assert_eq!(mixin.superclasses()[0].cached_index(), None);
        assert_eq!(db.is_type_of(mixin, "A", "Mixin<B>"), None);
        assert_eq!(db.is_type_of(mixin, "B", "Mixin<B>").as_deref(), Some("B"));
    }

    #[test]
    fn test_through_alias() {
        let db = make_db("Base<class T> ; Base.h ; M\nBaseD = Base<double> ; Base.h ; M\nD : BaseD ; D.h ; M\n");
        let d = db.find_entry("D").unwrap();
        assert_eq!(db.is_type_of(d, "Base", "D").as_deref(), Some("Base<double>"));
        // Second query hits the cache and still reports the aliased spelling
        assert_eq!(db.is_type_of(d, "Base", "D").as_deref(), Some("Base<double>"));
    }

    #[test]
    fn test_second_superclass_matches() {
        let db = make_db("A ; A.h ; M\nB ; B.h ; M\nC : A, B ; C.h ; M\n");
        let c = db.find_entry("C").unwrap();
        assert_eq!(db.is_type_of(c, "B", "C").as_deref(), Some("B"));
        assert_eq!(db.is_type_of(c, "A", "C").as_deref(), Some("A"));
    }

    #[test]
    fn test_diamond() {
        let db = make_db(
            "D ; D.h ; M\n\
             L : D ; L.h ; M\n\
             R : D ; R.h ; M\n\
             Z ; Z.h ; M\n\
             X : L, R ; X.h ; M\n",
        );
        let x = db.find_entry("X").unwrap();
        assert_eq!(db.is_type_of(x, "D", "X").as_deref(), Some("D"));
        assert_eq!(db.is_type_of(x, "R", "X").as_deref(), Some("R"));
        assert_eq!(db.is_type_of(x, "Z", "X"), None);
        // Twice more, now through cached slots on both branches
        assert_eq!(db.is_type_of(x, "D", "X").as_deref(), Some("D"));
        assert_eq!(db.is_type_of(x, "R", "X").as_deref(), Some("R"));
    }

    #[test]
    fn test_cycle_terminates() {
        let db = make_db("A : B ; A.h ; M\nB : A ; B.h ; M\n");
        let a = db.find_entry("A").unwrap();
        assert_eq!(db.is_type_of(a, "Z", "A"), None);
    }

    #[test]
    fn test_is_a_and_templated_superclass() {
        let db = make_db("Tuple<class T, int N> ; Tuple.h ; M\nVec<class T, int N = 3> : Tuple<T, N> ; Vec.h ; M\n");
        assert_eq!(db.is_a("Vec<float>", "Tuple").as_deref(), Some("Tuple<float, 3>"));
        let vec = db.find_entry("Vec").unwrap();
        assert_eq!(
            db.templated_superclass(vec, "Vec<int, 4>", 0).as_deref(),
            Some("Tuple<int, 4>")
        );
        assert_eq!(db.templated_superclass(vec, "Vec<int, 4>", 1), None);
    }
}
