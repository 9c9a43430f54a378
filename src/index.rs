//! Document index: the per-run collection of top-level entities.
//!
//! Lifecycle: `append` while collecting, then `finalize_merges` followed by
//! `finalize_sort` exactly once. The phase is tracked so that appending to a
//! finalized index, or sorting before merging, is reported instead of
//! silently producing out-of-order output.

use crate::error::IndexError;
use crate::model::*;
use tracing::debug;

/// Buckets searched for an extension's base, highest priority first.
const MERGE_PRIORITY: [Bucket; 4] = [
    Bucket::Structs,
    Bucket::Classes,
    Bucket::Enums,
    Bucket::Protocols,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Collecting,
    Merged,
    Sorted,
}

#[derive(Debug)]
pub struct DocumentIndex {
    buckets: [Vec<Entity>; 6],
    phase: Phase,
}

impl Default for DocumentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            phase: Phase::Collecting,
        }
    }

    /// Insert an entity into its bucket. A type, enum or protocol whose name
    /// is already present absorbs the newcomer's members instead.
    pub fn append(&mut self, entity: Entity) -> Result<(), IndexError> {
        if self.phase != Phase::Collecting {
            return Err(IndexError::Finalized(entity.name().to_string()));
        }

        let bucket = self.bucket_mut(entity.bucket());
        match entity {
            Entity::Type(_) | Entity::Enum(_) | Entity::Protocol(_) => {
                match bucket.iter_mut().find(|e| e.name() == entity.name()) {
                    Some(existing) => absorb(existing, entity),
                    None => bucket.push(entity),
                }
            }
            Entity::Alias(_) => {
                if bucket.iter().any(|e| e.name() == entity.name()) {
                    debug!(name = entity.name(), "duplicate typealias dropped");
                } else {
                    bucket.push(entity);
                }
            }
            Entity::Extension(_) => bucket.push(entity),
        }
        Ok(())
    }

    /// Fold every extension with a known base into that base. Extensions
    /// without a base stay in the extensions bucket. Idempotent.
    pub fn finalize_merges(&mut self) -> Result<(), IndexError> {
        if self.phase != Phase::Collecting {
            return Ok(());
        }

        let extensions = std::mem::take(self.bucket_mut(Bucket::Extensions));
        let mut standalone: Vec<Entity> = Vec::new();
        for extension in extensions {
            match self.merge_target(extension.name()) {
                Some(target) => {
                    let added = match target.members_mut() {
                        Some(members) => extend_members(members, extension.members().to_vec()),
                        None => 0,
                    };
                    debug!(name = extension.name(), added, "merged extension");
                }
                None => {
                    match standalone.iter_mut().find(|e| e.name() == extension.name()) {
                        Some(existing) => absorb(existing, extension),
                        None => standalone.push(extension),
                    }
                }
            }
        }
        *self.bucket_mut(Bucket::Extensions) = standalone;
        self.phase = Phase::Merged;
        Ok(())
    }

    /// Sort each bucket by name, case-sensitive ascending. Member order is
    /// left untouched.
    pub fn finalize_sort(&mut self) -> Result<(), IndexError> {
        match self.phase {
            Phase::Collecting => Err(IndexError::NotMerged),
            Phase::Sorted => Ok(()),
            Phase::Merged => {
                for bucket in &mut self.buckets {
                    bucket.sort_by(|a, b| a.name().cmp(b.name()));
                }
                self.phase = Phase::Sorted;
                Ok(())
            }
        }
    }

    /// Merge then sort.
    pub fn finalize(&mut self) -> Result<(), IndexError> {
        self.finalize_merges()?;
        self.finalize_sort()
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Sorted
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Entity] {
        &self.buckets[bucket.slot()]
    }

    /// Buckets in contents order, for rendering. Requires finalization.
    pub fn buckets(&self) -> Result<impl Iterator<Item = (Bucket, &[Entity])>, IndexError> {
        if !self.is_finalized() {
            return Err(IndexError::NotFinalized);
        }
        Ok(Bucket::CONTENTS_ORDER
            .into_iter()
            .map(move |b| (b, self.bucket(b))))
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Entity> {
        &mut self.buckets[bucket.slot()]
    }

    fn merge_target(&mut self, name: &str) -> Option<&mut Entity> {
        let slot = MERGE_PRIORITY.into_iter().find_map(|b| {
            self.bucket(b)
                .iter()
                .position(|e| e.name() == name)
                .map(|pos| (b, pos))
        })?;
        Some(&mut self.bucket_mut(slot.0)[slot.1])
    }
}

/// Fold a partial declaration into an existing entity of the same name.
fn absorb(existing: &mut Entity, incoming: Entity) {
    let decl = incoming.decl().clone();
    if let Some(members) = existing.members_mut() {
        extend_members(members, incoming.members().to_vec());
    }
    let target = existing.decl_mut();
    if target.doc_comment.is_none() {
        target.doc_comment = decl.doc_comment;
    }
    if target.declaration.is_none() {
        target.declaration = decl.declaration;
    }
    if target.access.is_none() {
        target.access = decl.access;
    }
    if target.location.is_none() {
        target.location = decl.location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::record::SymbolRecord;
    use serde_json::{json, Value};

    fn decl(name: &str) -> Decl {
        Decl {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn member(kind: MemberKind, name: &str, declaration: &str) -> Member {
        Member {
            kind,
            name: name.to_string(),
            declaration: Some(declaration.to_string()),
            doc_comment: None,
            access: None,
            location: None,
            offset: None,
        }
    }

    fn strukt(name: &str, members: Vec<Member>) -> Entity {
        Entity::Type(TypeEntity {
            flavor: TypeFlavor::Struct,
            decl: decl(name),
            members,
        })
    }

    fn extension(name: &str, members: Vec<Member>) -> Entity {
        Entity::Extension(ExtensionEntity {
            decl: decl(name),
            members,
        })
    }

    fn protocol(name: &str, members: Vec<Member>) -> Entity {
        Entity::Protocol(ProtocolEntity {
            decl: decl(name),
            members,
        })
    }

    fn names(index: &DocumentIndex, bucket: Bucket) -> Vec<&str> {
        index.bucket(bucket).iter().map(|e| e.name()).collect()
    }

    fn member_names(entity: &Entity) -> Vec<&str> {
        entity.members().iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn extension_merges_into_type() {
        let mut index = DocumentIndex::new();
        index
            .append(strukt(
                "Foo",
                vec![member(MemberKind::Property, "bar", "var bar: Int")],
            ))
            .unwrap();
        index
            .append(extension(
                "Foo",
                vec![member(MemberKind::Method, "baz()", "func baz()")],
            ))
            .unwrap();
        index.finalize().unwrap();

        assert_eq!(names(&index, Bucket::Structs), ["Foo"]);
        assert!(index.bucket(Bucket::Extensions).is_empty());
        assert_eq!(member_names(&index.bucket(Bucket::Structs)[0]), ["bar", "baz()"]);
    }

    #[test]
    fn merges_are_idempotent() {
        let mut index = DocumentIndex::new();
        index.append(strukt("Foo", vec![])).unwrap();
        let ext = extension("Foo", vec![member(MemberKind::Method, "baz()", "func baz()")]);
        index.append(ext.clone()).unwrap();
        index.append(ext).unwrap();
        index.finalize_merges().unwrap();
        index.finalize_merges().unwrap();
        index.finalize_sort().unwrap();

        assert_eq!(member_names(&index.bucket(Bucket::Structs)[0]), ["baz()"]);
    }

    #[test]
    fn unmatched_extension_stays_standalone() {
        let mut index = DocumentIndex::new();
        index
            .append(extension(
                "String",
                vec![member(MemberKind::Method, "trimmed()", "func trimmed() -> String")],
            ))
            .unwrap();
        index.finalize().unwrap();
        assert_eq!(names(&index, Bucket::Extensions), ["String"]);
        assert_eq!(index.bucket(Bucket::Extensions)[0].members().len(), 1);
    }

    #[test]
    fn standalone_extensions_of_one_type_combine() {
        let mut index = DocumentIndex::new();
        index
            .append(extension("Int", vec![member(MemberKind::Method, "a()", "func a()")]))
            .unwrap();
        index
            .append(extension("Int", vec![member(MemberKind::Method, "b()", "func b()")]))
            .unwrap();
        index.finalize().unwrap();
        assert_eq!(names(&index, Bucket::Extensions), ["Int"]);
        assert_eq!(member_names(&index.bucket(Bucket::Extensions)[0]), ["a()", "b()"]);
    }

    #[test]
    fn partial_declarations_combine() {
        let mut index = DocumentIndex::new();
        index
            .append(strukt("Foo", vec![member(MemberKind::Property, "a", "var a")]))
            .unwrap();
        let mut second = strukt("Foo", vec![member(MemberKind::Property, "b", "var b")]);
        second.decl_mut().doc_comment = Some("Late docs.".to_string());
        index.append(second).unwrap();

        let foo = &index.bucket(Bucket::Structs)[0];
        assert_eq!(index.bucket(Bucket::Structs).len(), 1);
        assert_eq!(member_names(foo), ["a", "b"]);
        assert_eq!(foo.decl().doc_comment.as_deref(), Some("Late docs."));
    }

    #[test]
    fn merge_priority_prefers_types_over_protocols() {
        let mut index = DocumentIndex::new();
        index.append(protocol("Shape", vec![])).unwrap();
        index.append(strukt("Shape", vec![])).unwrap();
        index
            .append(extension(
                "Shape",
                vec![member(MemberKind::Method, "area()", "func area()")],
            ))
            .unwrap();
        index.finalize().unwrap();

        assert_eq!(index.bucket(Bucket::Structs)[0].members().len(), 1);
        assert!(index.bucket(Bucket::Protocols)[0].members().is_empty());
    }

    #[test]
    fn extension_merges_into_protocol() {
        let mut index = DocumentIndex::new();
        index.append(protocol("Drawable", vec![])).unwrap();
        index
            .append(extension(
                "Drawable",
                vec![member(MemberKind::Method, "draw()", "func draw()")],
            ))
            .unwrap();
        index.finalize().unwrap();
        assert_eq!(index.bucket(Bucket::Protocols)[0].members().len(), 1);
        assert!(index.bucket(Bucket::Extensions).is_empty());
    }

    #[test]
    fn sort_is_case_sensitive_ascending() {
        let mut index = DocumentIndex::new();
        for name in ["beta", "Zed", "Alpha", "alpha", "Beta"] {
            index.append(strukt(name, vec![])).unwrap();
        }
        index.finalize().unwrap();
        assert_eq!(
            names(&index, Bucket::Structs),
            ["Alpha", "Beta", "Zed", "alpha", "beta"]
        );
    }

    #[test]
    fn sort_keeps_member_order() {
        let mut index = DocumentIndex::new();
        index
            .append(strukt(
                "Foo",
                vec![
                    member(MemberKind::Method, "z()", "func z()"),
                    member(MemberKind::Method, "a()", "func a()"),
                ],
            ))
            .unwrap();
        index.finalize().unwrap();
        assert_eq!(member_names(&index.bucket(Bucket::Structs)[0]), ["z()", "a()"]);
    }

    #[test]
    fn append_after_finalize_fails() {
        let mut index = DocumentIndex::new();
        index.finalize().unwrap();
        assert_eq!(
            index.append(strukt("Foo", vec![])),
            Err(IndexError::Finalized("Foo".to_string()))
        );
    }

    #[test]
    fn sort_before_merge_fails() {
        let mut index = DocumentIndex::new();
        assert_eq!(index.finalize_sort(), Err(IndexError::NotMerged));
        assert!(index.buckets().is_err());
    }

    #[test]
    fn duplicate_aliases_keep_first() {
        let mut index = DocumentIndex::new();
        for aliased in ["Int", "String"] {
            index
                .append(Entity::Alias(AliasEntity {
                    decl: decl("ID"),
                    aliased: Some(aliased.to_string()),
                }))
                .unwrap();
        }
        let aliases = index.bucket(Bucket::Typealiases);
        assert_eq!(aliases.len(), 1);
        assert!(matches!(
            &aliases[0],
            Entity::Alias(AliasEntity { aliased: Some(a), .. }) if a == "Int"
        ));
    }

    /// `sourcekitten structure` output: offsets but no parsed declarations.
    fn structure_record(kind: &str, name: &str, offset: u64, children: Vec<Value>) -> Value {
        json!({
            "key.kind": format!("source.lang.swift.decl.{}", kind),
            "key.name": name,
            "key.offset": offset,
            "key.substructure": children
        })
    }

    fn structure_entity(value: Value) -> Entity {
        let record = SymbolRecord::from_value(value).unwrap();
        classify(&record).unwrap().unwrap()
    }

    #[test]
    fn undeclared_overloads_survive_merge() {
        let init = |offset| structure_record("function.constructor", "init(_:)", offset, vec![]);
        let mut index = DocumentIndex::new();
        index
            .append(structure_entity(structure_record("struct", "Foo", 0, vec![init(10)])))
            .unwrap();
        index
            .append(structure_entity(structure_record("extension", "Foo", 80, vec![init(90)])))
            .unwrap();
        index.finalize().unwrap();

        assert_eq!(member_names(&index.bucket(Bucket::Structs)[0]), ["init(_:)", "init(_:)"]);
    }

    #[test]
    fn undeclared_partial_declarations_keep_every_member() {
        let run = |offset| structure_record("function.method.instance", "run()", offset, vec![]);
        let mut index = DocumentIndex::new();
        index
            .append(structure_entity(structure_record("class", "Job", 0, vec![run(12)])))
            .unwrap();
        index
            .append(structure_entity(structure_record("class", "Job", 0, vec![run(40)])))
            .unwrap();
        index.finalize().unwrap();

        assert_eq!(index.bucket(Bucket::Classes)[0].members().len(), 2);
    }

    #[test]
    fn undeclared_extension_ingested_twice_is_not_duplicated() {
        let ext = structure_record(
            "extension",
            "Foo",
            80,
            vec![structure_record("function.method.instance", "baz()", 90, vec![])],
        );
        let mut index = DocumentIndex::new();
        index.append(strukt("Foo", vec![])).unwrap();
        index.append(structure_entity(ext.clone())).unwrap();
        index.append(structure_entity(ext)).unwrap();
        index.finalize().unwrap();

        assert_eq!(member_names(&index.bucket(Bucket::Structs)[0]), ["baz()"]);
    }
}
