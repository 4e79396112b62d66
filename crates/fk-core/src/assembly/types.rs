//! Member, constraint and solved assembly types

use fk_cad::{Location, MateKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::feature::FeatureRef;
use crate::part::Part;

/// Something that can be placed in an assembly
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// A single part
    Part(Part),
    /// A solved sub-assembly, moved as one rigid body
    Assembly(SolvedAssembly),
}

impl Member {
    /// Get the member's name
    pub fn name(&self) -> &str {
        match self {
            Member::Part(part) => &part.name,
            Member::Assembly(assembly) => &assembly.name,
        }
    }

    /// Get the sub-assembly if this member is one
    pub fn as_assembly(&self) -> Option<&SolvedAssembly> {
        match self {
            Member::Part(_) => None,
            Member::Assembly(assembly) => Some(assembly),
        }
    }
}

/// A declared relation between two features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub a: FeatureRef,
    pub b: FeatureRef,
    pub kind: MateKind,
}

impl Constraint {
    /// Diagnostic label, e.g. `table_top@face<Z Axis leg1@face>Z`
    pub fn label(&self) -> String {
        format!("{} {} {}", self.a, self.kind.display_name(), self.b)
    }
}

/// A member with its solved location in the assembly frame
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedMember {
    pub location: Location,
    pub member: Member,
}

/// A part flattened out of a solved tree
#[derive(Debug, Clone)]
pub struct PlacedPart<'a> {
    /// Slash-separated path from the root assembly
    pub path: String,
    pub part: &'a Part,
    /// Location in the root assembly frame
    pub location: Location,
}

/// Immutable result of solving an assembly
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedAssembly {
    pub name: String,
    pub(crate) members: IndexMap<String, SolvedMember>,
    pub(crate) constraints: Vec<Constraint>,
}

impl SolvedAssembly {
    /// Iterate members in declaration order
    pub fn members(&self) -> impl Iterator<Item = (&str, &SolvedMember)> {
        self.members
            .iter()
            .map(|(name, member)| (name.as_str(), member))
    }

    /// Get a member's location in this assembly's frame
    pub fn location(&self, name: &str) -> Option<Location> {
        self.members.get(name).map(|m| m.location)
    }

    /// Constraints the assembly was solved from
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Resolve a part path (`"leg1"` or `"wall_shelf/v_l"`) to the part and
    /// its location in this assembly's frame
    pub fn part(&self, path: &str) -> Option<(&Part, Location)> {
        let (head, rest) = match path.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let solved = self.members.get(head)?;

        match (&solved.member, rest) {
            (Member::Part(part), None) => Some((part, solved.location)),
            (Member::Assembly(sub), Some(rest)) => {
                let (part, inner) = sub.part(rest)?;
                Some((part, solved.location.then(&inner)))
            }
            _ => None,
        }
    }

    /// Every part in the tree with its location in this assembly's frame
    pub fn placed_parts(&self) -> Vec<PlacedPart<'_>> {
        let mut parts = Vec::new();
        self.collect_parts("", Location::IDENTITY, &mut parts);
        parts
    }

    fn collect_parts<'a>(
        &'a self,
        prefix: &str,
        parent: Location,
        out: &mut Vec<PlacedPart<'a>>,
    ) {
        for (name, solved) in &self.members {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            let location = parent.then(&solved.location);
            match &solved.member {
                Member::Part(part) => out.push(PlacedPart {
                    path,
                    part,
                    location,
                }),
                Member::Assembly(sub) => sub.collect_parts(&path, location, out),
            }
        }
    }

    /// Number of parts in the whole tree
    pub fn part_count(&self) -> usize {
        self.members
            .values()
            .map(|m| match &m.member {
                Member::Part(_) => 1,
                Member::Assembly(sub) => sub.part_count(),
            })
            .sum()
    }
}
