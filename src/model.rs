//! Documentation entities, the typed form of classified symbol records.

use crate::record::{AccessLevel, SourceLocation};

/// Fields shared by every top-level entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decl {
    pub name: String,
    pub declaration: Option<String>,
    pub doc_comment: Option<String>,
    pub access: Option<AccessLevel>,
    pub location: Option<SourceLocation>,
}

/// Grouping used when rendering members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberKind {
    Case,
    Property,
    Method,
}

impl MemberKind {
    pub fn group_title(self) -> &'static str {
        match self {
            MemberKind::Case => "Cases",
            MemberKind::Property => "Properties",
            MemberKind::Method => "Methods",
        }
    }
}

/// A property, method or enumeration case.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub kind: MemberKind,
    pub name: String,
    pub declaration: Option<String>,
    pub doc_comment: Option<String>,
    /// `None` for enum cases, which inherit the enum's level.
    pub access: Option<AccessLevel>,
    pub location: Option<SourceLocation>,
    /// Byte offset within the source file.
    pub offset: Option<u64>,
}

impl Member {
    /// Two members describe the same declaration.
    ///
    /// Names alone never identify a member: overloads share them. Without a
    /// declaration on both sides, only an identical source position counts.
    pub fn same_declaration(&self, other: &Member) -> bool {
        if self.kind != other.kind || self.name != other.name {
            return false;
        }
        match (&self.declaration, &other.declaration) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.offset.is_some()
                    && self.offset == other.offset
                    && self.location == other.location
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    Struct,
    Class,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntity {
    pub flavor: TypeFlavor,
    pub decl: Decl,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionEntity {
    /// `decl.name` holds the base type name with conformances stripped.
    pub decl: Decl,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntity {
    pub decl: Decl,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolEntity {
    pub decl: Decl,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasEntity {
    pub decl: Decl,
    pub aliased: Option<String>,
}

/// Output bucket, one per document subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Structs,
    Classes,
    Enums,
    Protocols,
    Extensions,
    Typealiases,
}

impl Bucket {
    /// Order used in the contents document.
    pub const CONTENTS_ORDER: [Bucket; 6] = [
        Bucket::Protocols,
        Bucket::Structs,
        Bucket::Classes,
        Bucket::Enums,
        Bucket::Extensions,
        Bucket::Typealiases,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            Bucket::Structs => "structs",
            Bucket::Classes => "classes",
            Bucket::Enums => "enums",
            Bucket::Protocols => "protocols",
            Bucket::Extensions => "extensions",
            Bucket::Typealiases => "typealiases",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Bucket::Structs => "Structs",
            Bucket::Classes => "Classes",
            Bucket::Enums => "Enums",
            Bucket::Protocols => "Protocols",
            Bucket::Extensions => "Extensions",
            Bucket::Typealiases => "Typealiases",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Bucket::Structs => 0,
            Bucket::Classes => 1,
            Bucket::Enums => 2,
            Bucket::Protocols => 3,
            Bucket::Extensions => 4,
            Bucket::Typealiases => 5,
        }
    }
}

/// A classified, typed documentation unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Type(TypeEntity),
    Extension(ExtensionEntity),
    Enum(EnumEntity),
    Protocol(ProtocolEntity),
    Alias(AliasEntity),
}

impl Entity {
    pub fn decl(&self) -> &Decl {
        match self {
            Entity::Type(t) => &t.decl,
            Entity::Extension(e) => &e.decl,
            Entity::Enum(e) => &e.decl,
            Entity::Protocol(p) => &p.decl,
            Entity::Alias(a) => &a.decl,
        }
    }

    pub fn decl_mut(&mut self) -> &mut Decl {
        match self {
            Entity::Type(t) => &mut t.decl,
            Entity::Extension(e) => &mut e.decl,
            Entity::Enum(e) => &mut e.decl,
            Entity::Protocol(p) => &mut p.decl,
            Entity::Alias(a) => &mut a.decl,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl().name
    }

    pub fn members(&self) -> &[Member] {
        match self {
            Entity::Type(t) => &t.members,
            Entity::Extension(e) => &e.members,
            Entity::Enum(e) => &e.members,
            Entity::Protocol(p) => &p.members,
            Entity::Alias(_) => &[],
        }
    }

    /// Aliases have no member list.
    pub fn members_mut(&mut self) -> Option<&mut Vec<Member>> {
        match self {
            Entity::Type(t) => Some(&mut t.members),
            Entity::Extension(e) => Some(&mut e.members),
            Entity::Enum(e) => Some(&mut e.members),
            Entity::Protocol(p) => Some(&mut p.members),
            Entity::Alias(_) => None,
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            Entity::Type(TypeEntity { flavor: TypeFlavor::Struct, .. }) => Bucket::Structs,
            Entity::Type(TypeEntity { flavor: TypeFlavor::Class, .. }) => Bucket::Classes,
            Entity::Extension(_) => Bucket::Extensions,
            Entity::Enum(_) => Bucket::Enums,
            Entity::Protocol(_) => Bucket::Protocols,
            Entity::Alias(_) => Bucket::Typealiases,
        }
    }

    /// Label shown above the page title.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Entity::Type(TypeEntity { flavor: TypeFlavor::Struct, .. }) => "STRUCT",
            Entity::Type(TypeEntity { flavor: TypeFlavor::Class, .. }) => "CLASS",
            Entity::Extension(_) => "EXTENSION",
            Entity::Enum(_) => "ENUM",
            Entity::Protocol(_) => "PROTOCOL",
            Entity::Alias(_) => "TYPEALIAS",
        }
    }
}

/// Append members, skipping any already present.
///
/// Returns the number of members actually added.
pub fn extend_members(target: &mut Vec<Member>, incoming: impl IntoIterator<Item = Member>) -> usize {
    let mut added = 0;
    for member in incoming {
        if !target.iter().any(|m| m.same_declaration(&member)) {
            target.push(member);
            added += 1;
        }
    }
    added
}
