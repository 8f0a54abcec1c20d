//! Loading hierarchy sources and looking up entities

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use walkdir::WalkDir;

use crate::names::strip_template_args;
use crate::record::parse_record;
use crate::{Entity, HierarchyError, HierarchyWarning};

/// File extension of hierarchy description files found by [`DatabaseBuilder::load_dir`]
pub const HIERARCHY_EXTENSION: &str = "txt";

/// Outcome of loading a directory of hierarchy sources
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of sources merged
    pub sources: usize,
    /// Number of entities merged across those sources
    pub entities: usize,
    /// Sources that failed; nothing from them was merged
    pub failed: Vec<HierarchyError>,
}

/// Accumulates entities from any number of sources, then sorts them into a [`Database`]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    entities: Vec<Entity>,
    names: HashSet<String>,
    warnings: Vec<HierarchyWarning>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole source and merge it. Returns the number of entities added.
    ///
    /// The source is parsed completely before anything is merged, so a
    /// malformed record leaves the builder untouched.
    pub fn load_str(&mut self, source_name: &str, text: &str) -> Result<usize, HierarchyError> {
        let staged = parse_source(source_name, text)?;
        let total = staged.len();

        let mut added = 0;
        for entity in staged {
            if self.names.contains(&entity.name) {
                tracing::warn!(entity = %entity.name, source = source_name, "duplicate entity ignored");
                self.warnings.push(HierarchyWarning::DuplicateEntity {
                    name: entity.name,
                    source_name: source_name.to_string(),
                });
                continue;
            }
            self.names.insert(entity.name.clone());
            self.entities.push(entity);
            added += 1;
        }

        tracing::debug!(source = source_name, records = total, added, "loaded hierarchy source");
        Ok(added)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, HierarchyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| HierarchyError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        self.load_str(&path.display().to_string(), &text)
    }

    /// Load every `*.txt` file below `dir`, in path order.
    ///
    /// A failing source is reported and skipped; only an unreadable
    /// directory tree aborts the walk.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<LoadReport, HierarchyError> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = entry?;
            let is_hierarchy = entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some(HIERARCHY_EXTENSION);
            if is_hierarchy {
                paths.push(entry.into_path());
            }
        }

        let mut report = LoadReport::default();
        for path in paths {
            match self.load_file(&path) {
                Ok(added) => {
                    report.sources += 1;
                    report.entities += added;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping hierarchy source");
                    report.failed.push(err);
                }
            }
        }
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Sort by name and freeze
    pub fn build(self) -> Database {
        let DatabaseBuilder {
            mut entities,
            warnings,
            ..
        } = self;
        entities.sort_by(|a, b| a.name.cmp(&b.name));

        let mut db = Database {
            entities,
            lookups: AtomicUsize::new(0),
            warnings,
        };

        let mut found = db.unresolved_superclasses();
        found.extend(db.check_inheritance());
        db.warnings.extend(found);
        db.lookups.store(0, Ordering::Relaxed);

        tracing::debug!(
            entities = db.len(),
            warnings = db.warnings.len(),
            "hierarchy database built"
        );
        db
    }
}

/// Parse every record of one source, stopping at the first malformed one
fn parse_source(source_name: &str, text: &str) -> Result<Vec<Entity>, HierarchyError> {
    let mut entities = Vec::new();
    let mut offset = 0;

    for (index, raw) in text.split_inclusive('\n').enumerate() {
        let line = raw.trim_end_matches(&['\n', '\r'][..]);
        let content = line.trim_start();
        if !content.is_empty() && !content.starts_with('#') {
            let entity = parse_record(line, offset).map_err(|error| HierarchyError::Record {
                source_name: source_name.to_string(),
                line: index + 1,
                error,
            })?;
            entities.push(entity);
        }
        offset += raw.len();
    }

    Ok(entities)
}

/// Read-only, name-sorted hierarchy of classes, typedefs, and enums
#[derive(Debug)]
pub struct Database {
    pub(crate) entities: Vec<Entity>,
    /// Binary searches performed, for observing superclass memoization
    lookups: AtomicUsize,
    warnings: Vec<HierarchyWarning>,
}

/// Summary used by the CLI's `hierarchy` report
#[derive(Debug, Serialize)]
pub struct DatabaseSummary<'a> {
    pub entities: usize,
    pub classes: usize,
    pub typedefs: usize,
    pub enums: usize,
    pub warnings: &'a [HierarchyWarning],
}

impl Database {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in name order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Find an entity by name. Template arguments are ignored, so
    /// `vtkVector<double, 3>` finds `vtkVector`.
    pub fn find_entry(&self, name: &str) -> Option<&Entity> {
        self.find_index(name).map(|i| &self.entities[i])
    }

    /// Position of the named entity in name order
    pub fn find_index(&self, name: &str) -> Option<usize> {
        let key = strip_template_args(name);
        if key.is_empty() {
            return None;
        }
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.entities
            .binary_search_by(|e| e.name.as_str().cmp(key.as_str()))
            .ok()
    }

    /// Number of name searches performed since the database was built
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Duplicates, inheritance cycles, and unresolved superclasses
    pub fn warnings(&self) -> &[HierarchyWarning] {
        &self.warnings
    }

    /// Whether the named entity carries `flag`; unknown names are never excluded
    pub fn is_excluded(&self, name: &str, flag: &str) -> bool {
        self.find_entry(name).is_some_and(|e| e.has_flag(flag))
    }

    pub fn summary(&self) -> DatabaseSummary<'_> {
        DatabaseSummary {
            entities: self.len(),
            classes: self.iter().filter(|e| e.is_class()).count(),
            typedefs: self.iter().filter(|e| e.is_typedef()).count(),
            enums: self.iter().filter(|e| e.is_enum()).count(),
            warnings: &self.warnings,
        }
    }

    fn unresolved_superclasses(&self) -> Vec<HierarchyWarning> {
        let mut warnings = Vec::new();
        for entity in self.iter() {
            for sup in entity.superclasses() {
                // Superclasses chosen by a template argument resolve per instantiation
                if crate::names::key_depends_on(&sup.name, entity.template_params()) {
                    continue;
                }
                if self.resolve_class(&sup.name).is_none() {
                    warnings.push(HierarchyWarning::UnresolvedSuperclass {
                        entity: entity.name.clone(),
                        superclass: sup.name.clone(),
                    });
                }
            }
        }
        warnings
    }
}
