//! Assemblies of parts held together by mate constraints
//!
//! An [`AssemblyBuilder`] collects members and constraints, resolving every
//! feature reference as soon as it is declared. [`AssemblyBuilder::solve`]
//! consumes the builder, hands the whole constraint list to the solver in one
//! go and returns an immutable [`SolvedAssembly`].

mod types;

use fk_cad::{Datum, Location, Mate, MateKind, MateSolver, SolveError};
use indexmap::IndexMap;

pub use types::{Constraint, Member, PlacedPart, SolvedAssembly, SolvedMember};

use crate::feature::FeatureRef;
use crate::part::Part;

/// Member slot before solving
#[derive(Debug, Clone)]
struct Slot {
    member: Member,
    location: Option<Location>,
}

/// Builder for a single assembly level
#[derive(Debug, Clone)]
pub struct AssemblyBuilder {
    name: String,
    members: IndexMap<String, Slot>,
    constraints: Vec<Constraint>,
    mates: Vec<Mate>,
}

impl AssemblyBuilder {
    /// Create a new empty assembly
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
            constraints: Vec::new(),
            mates: Vec::new(),
        }
    }

    /// Get the assembly name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a part; the first member added is the anchor
    pub fn add_part(&mut self, part: Part) -> Result<&mut Self, AssemblyError> {
        self.add_member(Member::Part(part), None)
    }

    /// Add a part with an initial location
    ///
    /// Only the anchor keeps its initial location; every other member is
    /// placed by its constraints.
    pub fn add_part_at(
        &mut self,
        part: Part,
        location: Location,
    ) -> Result<&mut Self, AssemblyError> {
        self.add_member(Member::Part(part), Some(location))
    }

    /// Add a solved sub-assembly as one rigid member
    pub fn add_assembly(&mut self, assembly: SolvedAssembly) -> Result<&mut Self, AssemblyError> {
        self.add_member(Member::Assembly(assembly), None)
    }

    fn add_member(
        &mut self,
        member: Member,
        location: Option<Location>,
    ) -> Result<&mut Self, AssemblyError> {
        let name = member.name().to_string();
        if name.is_empty() || name.contains('/') {
            return Err(AssemblyError::InvalidMemberName(name));
        }
        if self.members.contains_key(&name) {
            return Err(AssemblyError::DuplicateMember(name));
        }
        self.members.insert(name, Slot { member, location });
        Ok(self)
    }

    /// Declare a relation between two features
    ///
    /// Both references are resolved immediately, so a missing member or tag
    /// is reported here rather than at solve time.
    pub fn constrain(
        &mut self,
        a: FeatureRef,
        b: FeatureRef,
        kind: MateKind,
    ) -> Result<&mut Self, AssemblyError> {
        let (body_a, datum_a) = self.resolve(&a, kind)?;
        let (body_b, datum_b) = self.resolve(&b, kind)?;

        let constraint = Constraint { a, b, kind };
        self.mates.push(Mate::new(
            constraint.label(),
            kind,
            (body_a, datum_a),
            (body_b, datum_b),
        ));
        self.constraints.push(constraint);
        Ok(self)
    }

    /// Find the member index and the datum in that member's frame
    fn resolve(
        &self,
        feature: &FeatureRef,
        kind: MateKind,
    ) -> Result<(usize, Datum), AssemblyError> {
        let unknown = || AssemblyError::UnknownMember(feature.path.clone());
        let (member_name, inner) = feature.split_path();
        let (index, _, slot) = self.members.get_full(member_name).ok_or_else(unknown)?;

        let (part, location) = match (&slot.member, inner) {
            (Member::Part(part), None) => (part, Location::IDENTITY),
            (Member::Assembly(sub), Some(inner)) => sub.part(inner).ok_or_else(unknown)?,
            _ => return Err(unknown()),
        };

        let datum = part
            .feature(&feature.key)
            .ok_or_else(|| AssemblyError::MissingFeature {
                part: feature.path.clone(),
                tag: feature.key.to_string(),
            })?;

        if !kind.accepts(datum) {
            return Err(AssemblyError::IncompatibleFeature {
                feature: feature.to_string(),
                kind: kind.display_name(),
                datum: datum.kind_name(),
            });
        }

        Ok((index, datum.transformed(&location)))
    }

    /// Solve every constraint at once
    pub fn solve(self, solver: &MateSolver) -> Result<SolvedAssembly, AssemblyError> {
        let names: Vec<&str> = self.members.keys().map(String::as_str).collect();
        let anchor = self
            .members
            .first()
            .and_then(|(_, slot)| slot.location)
            .unwrap_or_default();

        let locations = solver
            .solve(&names, anchor, &self.mates)
            .map_err(|source| AssemblyError::Unsatisfiable {
                assembly: self.name.clone(),
                source,
            })?;

        tracing::info!(
            assembly = %self.name,
            members = self.members.len(),
            constraints = self.constraints.len(),
            "Solved assembly"
        );

        let members = self
            .members
            .into_iter()
            .zip(locations)
            .map(|((name, slot), location)| {
                (
                    name,
                    SolvedMember {
                        location,
                        member: slot.member,
                    },
                )
            })
            .collect();

        Ok(SolvedAssembly {
            name: self.name,
            members,
            constraints: self.constraints,
        })
    }
}

/// Assembly-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssemblyError {
    #[error("Member name '{0}' is empty or contains '/'")]
    InvalidMemberName(String),
    #[error("Duplicate member: {0}")]
    DuplicateMember(String),
    #[error("Unknown member: {0}")]
    UnknownMember(String),
    #[error("Part '{part}' has no feature '{tag}'")]
    MissingFeature { part: String, tag: String },
    #[error("{kind} constraint cannot use {feature} (a {datum})")]
    IncompatibleFeature {
        feature: String,
        kind: &'static str,
        datum: &'static str,
    },
    #[error("Assembly '{assembly}' cannot be solved: {source}")]
    Unsatisfiable {
        assembly: String,
        #[source]
        source: SolveError,
    },
}
