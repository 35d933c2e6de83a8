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

//! Helix adjacency and crossover detection.

use ultraviolet::Vec3;

use crate::bases::{BaseId, Bases};
use crate::errors::StructureError;
use crate::helices::{Helices, Helix, StrandRole};

/// Adjacency between two lattice-neighbouring helices.
///
/// Adjacency is symmetric but stored directionally: each unordered pair of
/// neighbours yields two connections, one per direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelixConnection {
    pub from_helix: usize,
    pub to_helix: usize,
    /// Unit vector pointing from the `from` helix toward the `to` helix.
    pub direction: Vec3,
    /// The crossovers found between this pair, in position order.
    pub crossovers: Vec<Crossover>,
}

/// A point where a strand's path switches from one helix to an adjacent
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossover {
    /// The helix the strand leaves from.
    pub helix: usize,
    /// The helix the strand switches to; identifies the connection this
    /// crossover belongs to.
    pub to_helix: usize,
    /// The base at which the strand leaves its helix.
    pub base: BaseId,
    /// The strand crossing over.
    pub strand: usize,
}

/// Create a connection for every ordered pair of distinct helices whose
/// lattice coordinates are at Manhattan distance exactly 1.
pub(crate) fn compute_adjacency(helices: &Helices) -> Result<Vec<HelixConnection>, StructureError> {
    let mut connections = Vec::new();
    for helix1 in helices.values() {
        for helix2 in helices.values() {
            let distance = (helix1.lattice_row - helix2.lattice_row).abs()
                + (helix1.lattice_col - helix2.lattice_col).abs();
            if distance == 1 {
                connections.push(HelixConnection {
                    from_helix: helix1.lattice_num,
                    to_helix: helix2.lattice_num,
                    direction: connection_direction(helix1, helix2)?,
                    crossovers: Vec::new(),
                });
            }
        }
    }
    Ok(connections)
}

/// Unit vector from `from` toward the adjacent helix `to`.
///
/// The vector between representative axis points of the two helices is
/// projected onto the long axis of `to`. Using the helix axes instead of a
/// lattice lookup table keeps the computation valid for off-lattice
/// geometries.
fn connection_direction(from: &Helix, to: &Helix) -> Result<Vec3, StructureError> {
    let pt1 = representative_axis_point(from)?;
    let pt2 = representative_axis_point(to)?;
    let axis2 = to.long_axis(0);
    let axis2_length = axis2.mag();
    if axis2_length == 0.0 {
        return Err(StructureError::DegenerateGeometry(format!(
            "helix {} has a zero-length long axis",
            to.lattice_num
        )));
    }
    let d = axis2.dot(pt1 - pt2) / axis2_length;
    let projected = pt2 + axis2 * d;
    let direction = projected - pt1;
    let length = direction.mag();
    if length == 0.0 {
        return Err(StructureError::DegenerateGeometry(format!(
            "helices {} and {} have coincident axis points",
            from.lattice_num, to.lattice_num
        )));
    }
    Ok(direction / length)
}

/// The axis point of the helix at its first non-empty staple position.
fn representative_axis_point(helix: &Helix) -> Result<Vec3, StructureError> {
    let position = helix.first_staple_position().ok_or_else(|| {
        StructureError::MalformedTopology(format!(
            "no starting base found in helix {}",
            helix.lattice_num
        ))
    })?;
    helix.axis_nodes.get(position).copied().ok_or_else(|| {
        StructureError::MalformedTopology(format!(
            "helix {} has no axis node at position {}",
            helix.lattice_num, position
        ))
    })
}

impl Helix {
    /// Scan this helix's staple then scaffold bases and record, on each of
    /// its connections, a crossover for every base whose strand neighbour
    /// lies on the connected helix.
    ///
    /// A base contributes one crossover per cross-helix link, so a base
    /// whose 5' and 3' neighbours both land on the same adjacent helix
    /// yields two. Expects `connectivity` to be populated.
    pub fn compute_design_crossovers(&mut self, bases: &Bases) -> Result<(), StructureError> {
        log::debug!(
            "computing design crossovers of helix {} ({} connections)",
            self.lattice_num,
            self.connectivity.len()
        );
        for c in 0..self.connectivity.len() {
            let to_helix = self.connectivity[c].to_helix;
            let mut crossovers = Vec::new();
            for &role in [StrandRole::Staple, StrandRole::Scaffold].iter() {
                for slot in self.base_array(role) {
                    let base = match slot {
                        Some(id) => bases.try_get(*id)?,
                        None => continue,
                    };
                    if let Some(down_id) = base.down {
                        let down = bases.try_get(down_id)?;
                        if down.helix != base.helix && down.helix == to_helix {
                            crossovers.push(Crossover {
                                helix: self.lattice_num,
                                to_helix,
                                base: base.id,
                                strand: base.strand,
                            });
                        }
                    }
                    if let Some(up_id) = base.up {
                        let up = bases.try_get(up_id)?;
                        if up.helix != base.helix && up.helix == to_helix {
                            crossovers.push(Crossover {
                                helix: self.lattice_num,
                                to_helix,
                                base: base.id,
                                strand: base.strand,
                            });
                        }
                    }
                }
            }
            log::debug!(
                "helix {} -> {}: {} crossovers",
                self.lattice_num,
                to_helix,
                crossovers.len()
            );
            self.connectivity[c].crossovers = crossovers;
        }
        Ok(())
    }
}
