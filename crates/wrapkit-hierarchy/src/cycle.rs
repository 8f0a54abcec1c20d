//! Inheritance cycle detection
//!
//! Cycles make no sense in a class hierarchy but can appear in generated
//! descriptions; they are reported as warnings, and ancestry queries stop
//! at them on their own.

use crate::{Database, HierarchyWarning};

/// Visit state for DFS cycle detection
#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    NotVisited,
    InProgress,
    Completed,
}

struct CycleDetector<'a> {
    db: &'a Database,
    state: Vec<VisitState>,
    path: Vec<usize>,
}

impl<'a> CycleDetector<'a> {
    fn new(db: &'a Database) -> Self {
        Self {
            db,
            state: vec![VisitState::NotVisited; db.len()],
            path: Vec::new(),
        }
    }

    fn detect(mut self) -> Vec<HierarchyWarning> {
        let mut warnings = Vec::new();
        for node in 0..self.db.len() {
            if self.state[node] == VisitState::NotVisited {
                self.visit(node, &mut warnings);
            }
        }
        warnings
    }

    /// Resolved superclass positions; unresolvable ones are not edges
    fn superclasses_of(&self, node: usize) -> Vec<usize> {
        self.db.entities[node]
            .superclasses()
            .iter()
            .filter_map(|sup| self.db.resolve_class(&sup.name).map(|(i, _)| i))
            .collect()
    }

    fn visit(&mut self, node: usize, warnings: &mut Vec<HierarchyWarning>) {
        self.state[node] = VisitState::InProgress;
        self.path.push(node);

        for parent in self.superclasses_of(node) {
            match self.state[parent] {
                VisitState::InProgress => {
                    let start = self.path.iter().position(|&n| n == parent).unwrap_or(0);
                    let names: Vec<&str> = self.path[start..]
                        .iter()
                        .map(|&n| self.db.entities[n].name.as_str())
                        .collect();
                    let cycle = format!("{} -> {}", names.join(" -> "), self.db.entities[parent].name);
                    tracing::warn!(%cycle, "inheritance cycle");
                    warnings.push(HierarchyWarning::InheritanceCycle { cycle });
                }
                VisitState::NotVisited => self.visit(parent, warnings),
                VisitState::Completed => {}
            }
        }

        self.path.pop();
        self.state[node] = VisitState::Completed;
    }
}

impl Database {
    /// Report every inheritance cycle once
    pub fn check_inheritance(&self) -> Vec<HierarchyWarning> {
        CycleDetector::new(self).detect()
    }
}
