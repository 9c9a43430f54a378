//! Walks symbol trees and feeds the document index.

use crate::classify::classify;
use crate::error::{ClassifyError, IndexError};
use crate::index::DocumentIndex;
use crate::input::Module;
use crate::model::{Entity, MemberKind};
use crate::record::{AccessLevel, SymbolRecord};
use tracing::{debug, info, warn};

/// Everything found in one tree, in pre-order.
#[derive(Debug, Default)]
pub struct Discovered {
    pub entities: Vec<Entity>,
    pub malformed: Vec<ClassifyError>,
}

/// Walk `records` depth-first, pre-order. Every node is classified, then its
/// children are visited whether or not it classified.
pub fn discover(records: &[SymbolRecord]) -> Discovered {
    let mut found = Discovered::default();
    for record in records {
        walk(record, &mut found);
    }
    found
}

fn walk(record: &SymbolRecord, found: &mut Discovered) {
    match classify(record) {
        Ok(Some(entity)) => found.entities.push(entity),
        Ok(None) => {}
        Err(err) => found.malformed.push(err),
    }
    for child in record.children() {
        walk(child, found);
    }
}

/// Summary of one run over all modules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub appended: usize,
    pub malformed: usize,
    pub filtered: usize,
}

/// Feeds modules into an index, one after another.
pub struct Driver<'a> {
    index: &'a mut DocumentIndex,
    min_access: AccessLevel,
    stats: Stats,
}

impl<'a> Driver<'a> {
    pub fn new(index: &'a mut DocumentIndex, min_access: AccessLevel) -> Self {
        Self {
            index,
            min_access,
            stats: Stats::default(),
        }
    }

    /// Traverse one module. Malformed entities are logged and skipped;
    /// only index misuse is an error.
    pub fn process(&mut self, module: &Module) -> Result<(), IndexError> {
        let found = discover(&module.records);
        info!(
            module = %module.name,
            entities = found.entities.len(),
            "traversed module"
        );

        for err in &found.malformed {
            warn!(module = %module.name, "skipping malformed declaration: {}", err);
        }
        self.stats.malformed += found.malformed.len();

        for mut entity in found.entities {
            if !self.visible(&entity) {
                debug!(name = entity.name(), "below minimum access level");
                self.stats.filtered += 1;
                continue;
            }
            let min = self.min_access;
            if let Some(members) = entity.members_mut() {
                members.retain(|m| {
                    m.kind == MemberKind::Case || m.access.unwrap_or_default() >= min
                });
            }
            self.index.append(entity)?;
            self.stats.appended += 1;
        }
        Ok(())
    }

    /// Extensions carry no access level of their own worth filtering on;
    /// their members are filtered instead.
    fn visible(&self, entity: &Entity) -> bool {
        match entity {
            Entity::Extension(_) => true,
            _ => entity.decl().access.unwrap_or_default() >= self.min_access,
        }
    }

    pub fn finish(self) -> Stats {
        self.stats
    }
}
