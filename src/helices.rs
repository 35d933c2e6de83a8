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

use std::collections::BTreeMap;

use ultraviolet::{Mat3, Vec3};

use crate::bases::{BaseId, Bases};
use crate::connectivity::HelixConnection;
use crate::domains::DomainId;
use crate::errors::StructureError;

/// Intrinsic 5'→3' traversal direction of a helix's scaffold strand with
/// respect to the position index.
///
/// `ThreePrime` means the scaffold runs 3'→5' when positions increase, so
/// its 5'→3' order is position-descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    ThreePrime,
    FivePrime,
}

impl Polarity {
    pub fn is_three_to_five(&self) -> bool {
        matches!(self, Polarity::ThreePrime)
    }
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::ThreePrime
    }
}

/// The two strand roles a helix holds base arrays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrandRole {
    Staple,
    Scaffold,
}

/// A virtual helix: a cylindrical structural element at fixed lattice
/// coordinates, holding ordered base positions for the two strand roles.
///
/// Topology fields are set once by the loader; the derived fields (base
/// arrays, domain list, connectivity) are filled by
/// [`Structure::compute_aux_data`](crate::Structure::compute_aux_data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Helix {
    /// Unique in-structure identifier.
    pub lattice_num: usize,
    pub lattice_row: i32,
    pub lattice_col: i32,
    #[serde(default)]
    pub scaffold_polarity: Polarity,
    /// Origin of the helix axis at each terminus.
    pub end_coordinates: [Vec3; 2],
    /// Right-handed orthonormal frame at each terminus. Column 2 holds the
    /// long axis of the helix.
    pub end_frames: [Mat3; 2],
    /// One 3D point per base position along the helix axis.
    pub axis_nodes: Vec<Vec3>,

    #[serde(default, skip)]
    pub(crate) staple_bases: Vec<Option<BaseId>>,
    #[serde(default, skip)]
    pub(crate) scaffold_bases: Vec<Option<BaseId>>,
    #[serde(default, skip)]
    pub(crate) domains: Vec<DomainId>,
    #[serde(default, skip)]
    pub(crate) connectivity: Vec<HelixConnection>,
}

impl Helix {
    pub fn new(
        lattice_num: usize,
        lattice_row: i32,
        lattice_col: i32,
        scaffold_polarity: Polarity,
        axis_nodes: Vec<Vec3>,
        end_coordinates: [Vec3; 2],
        end_frames: [Mat3; 2],
    ) -> Self {
        Self {
            lattice_num,
            lattice_row,
            lattice_col,
            scaffold_polarity,
            end_coordinates,
            end_frames,
            axis_nodes,
            staple_bases: Vec::new(),
            scaffold_bases: Vec::new(),
            domains: Vec::new(),
            connectivity: Vec::new(),
        }
    }

    /// Position → base array for the staple role. Same length as the
    /// scaffold array and as every other helix's arrays in the structure.
    pub fn staple_bases(&self) -> &[Option<BaseId>] {
        &self.staple_bases
    }

    /// Position → base array for the scaffold role.
    pub fn scaffold_bases(&self) -> &[Option<BaseId>] {
        &self.scaffold_bases
    }

    pub fn base_array(&self, role: StrandRole) -> &[Option<BaseId>] {
        match role {
            StrandRole::Staple => &self.staple_bases,
            StrandRole::Scaffold => &self.scaffold_bases,
        }
    }

    /// The domains owned by this helix, in creation order.
    pub fn domains(&self) -> &[DomainId] {
        &self.domains
    }

    /// The connections from this helix to its lattice neighbours.
    pub fn connectivity(&self) -> &[HelixConnection] {
        &self.connectivity
    }

    /// Long axis of the helix at terminus `end` (0 or 1).
    pub fn long_axis(&self, end: usize) -> Vec3 {
        self.end_frames[end].cols[2]
    }

    /// Position of the first non-empty staple slot.
    pub(crate) fn first_staple_position(&self) -> Option<usize> {
        self.staple_bases.iter().position(|slot| slot.is_some())
    }

    pub(crate) fn clear_aux_data(&mut self) {
        self.staple_bases.clear();
        self.scaffold_bases.clear();
        self.domains.clear();
        self.connectivity.clear();
    }
}

/// The collection of all helices in a structure, keyed by `lattice_num`,
/// with an index from lattice coordinates to `lattice_num`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<usize, Helix>", into = "BTreeMap<usize, Helix>")]
pub struct Helices {
    map: BTreeMap<usize, Helix>,
    coordinates: BTreeMap<(i32, i32), usize>,
}

impl From<BTreeMap<usize, Helix>> for Helices {
    fn from(map: BTreeMap<usize, Helix>) -> Self {
        let coordinates = map
            .values()
            .map(|h| ((h.lattice_row, h.lattice_col), h.lattice_num))
            .collect();
        Self { map, coordinates }
    }
}

impl From<Helices> for BTreeMap<usize, Helix> {
    fn from(helices: Helices) -> Self {
        helices.map
    }
}

impl Helices {
    pub fn new(helices: Vec<Helix>) -> Self {
        helices
            .into_iter()
            .map(|h| (h.lattice_num, h))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    pub fn get(&self, lattice_num: usize) -> Option<&Helix> {
        self.map.get(&lattice_num)
    }

    pub(crate) fn get_mut(&mut self, lattice_num: usize) -> Option<&mut Helix> {
        self.map.get_mut(&lattice_num)
    }

    /// The helix at the given lattice coordinates, if any.
    pub fn at_coordinates(&self, row: i32, col: i32) -> Option<&Helix> {
        let lattice_num = self.coordinates.get(&(row, col))?;
        self.map.get(lattice_num)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Helix)> {
        self.map.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Helix> {
        self.map.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Helix> {
        self.map.values_mut()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Bucket every base into its helix's per-position staple or scaffold
/// array.
///
/// Arrays are sized to `capacity`, identical for every helix in the
/// structure; unfilled positions stay empty.
pub(crate) fn bucket_bases(
    bases: &Bases,
    helices: &mut Helices,
    capacity: usize,
) -> Result<(), StructureError> {
    for helix in helices.values_mut() {
        helix.staple_bases = vec![None; capacity];
        helix.scaffold_bases = vec![None; capacity];
    }
    for base in bases.iter() {
        let helix = helices.get_mut(base.helix).ok_or_else(|| {
            StructureError::MalformedTopology(format!(
                "base {} references unknown helix {}",
                base.id, base.helix
            ))
        })?;
        let array = if base.is_scaffold {
            &mut helix.scaffold_bases
        } else {
            &mut helix.staple_bases
        };
        let slot = array.get_mut(base.position).ok_or_else(|| {
            StructureError::MalformedTopology(format!(
                "base {} at position {} exceeds the helix capacity {}",
                base.id, base.position, capacity
            ))
        })?;
        *slot = Some(base.id);
    }
    Ok(())
}
