/*
origami-topology, a connectivity and geometry model for DNA nanostructures.

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::domains::DomainId;
use crate::errors::StructureError;

/// Identifier of a base in the structure's base arena.
///
/// Base ids are 1-based and dense: the design loader hands over bases
/// numbered `1..=n` and the arena stores them in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BaseId(pub usize);

impl std::fmt::Display for BaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orientation of a base pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairingOrientation {
    Antiparallel,
    Parallel,
}

/// The pairing state of a base.
///
/// cadnano-derived data encodes this as a signed sentinel overloading the
/// paired base id; it is an explicit sum type here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Across {
    Unpaired,
    Paired {
        base: BaseId,
        orientation: PairingOrientation,
    },
}

impl Across {
    pub fn is_paired(&self) -> bool {
        matches!(self, Across::Paired { .. })
    }

    pub fn paired_base(&self) -> Option<BaseId> {
        match self {
            Across::Paired { base, .. } => Some(*base),
            Across::Unpaired => None,
        }
    }
}

/// One nucleotide position on one helix.
///
/// `up` and `down` form a singly-linked path per strand; `across` is
/// symmetric when both ends are present. Both properties are assumed valid
/// on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub id: BaseId,
    /// `lattice_num` of the helix carrying this base.
    pub helix: usize,
    /// Position of the base within its helix.
    pub position: usize,
    /// Identifier of the strand this base belongs to.
    pub strand: usize,
    pub is_scaffold: bool,
    /// The 5' neighbour of this base on its strand, if any.
    pub up: Option<BaseId>,
    /// The 3' neighbour of this base on its strand, if any.
    pub down: Option<BaseId>,
    pub across: Across,
    /// The domain owning this base, assigned by domain computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainId>,
}

impl Base {
    pub fn new(id: BaseId, helix: usize, position: usize, strand: usize, is_scaffold: bool) -> Self {
        Self {
            id,
            helix,
            position,
            strand,
            is_scaffold,
            up: None,
            down: None,
            across: Across::Unpaired,
            domain: None,
        }
    }
}

/// The base arena. Bases are addressed by their 1-based dense `BaseId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bases(Vec<Base>);

impl Bases {
    pub fn new(bases: Vec<Base>) -> Self {
        Self(bases)
    }

    pub fn get(&self, id: BaseId) -> Option<&Base> {
        self.0.get(id.0.checked_sub(1)?)
    }

    pub(crate) fn get_mut(&mut self, id: BaseId) -> Option<&mut Base> {
        self.0.get_mut(id.0.checked_sub(1)?)
    }

    /// Resolve an id, upgrading a dangling reference to an explicit error.
    pub(crate) fn try_get(&self, id: BaseId) -> Result<&Base, StructureError> {
        self.get(id).ok_or_else(|| {
            StructureError::MalformedTopology(format!(
                "base id {} is outside the structure's base range",
                id
            ))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Base> {
        self.0.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Base> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
