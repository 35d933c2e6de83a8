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

//! Connectivity and geometry model of a DNA nanostructure (origami).
//!
//! A DNA structure consists of scaffold and staple strands bound together
//! through a lattice of virtual helices. The input (a per-base
//! connectivity graph, helices with lattice coordinates and end geometry,
//! and strand tours) is produced by a design loader and consumed as-is.
//! This crate derives the higher-level abstractions from it: strand→helix
//! membership, contiguous double/single-stranded [`Domain`]s, inter-helix
//! adjacency ([`HelixConnection`]) and [`Crossover`] points.
//!
//! The derivation is a pipeline of stages run by
//! [`Structure::compute_aux_data`], in order: attach each strand's helix
//! references, bucket bases into per-helix staple/scaffold arrays, compute
//! domains (including cross-strand domain pairing), compute helix adjacency
//! from lattice coordinates, and compute design crossovers per helix.

#[macro_use]
extern crate serde_derive;
extern crate serde;

/// Re-export ultraviolet for linear algebra.
pub use ultraviolet;

mod bases;
mod connectivity;
mod domains;
mod errors;
mod helices;
mod strands;
#[cfg(test)]
mod tests;

pub use bases::{Across, Base, BaseId, Bases, PairingOrientation};
pub use connectivity::{Crossover, HelixConnection};
pub use domains::{Domain, DomainId};
pub use errors::StructureError;
pub use helices::{Helices, Helix, Polarity, StrandRole};
pub use strands::{Strand, Strands};

/// The aggregate DNA structure: all bases, helices and strands, plus the
/// derived domain, connectivity and crossover sets.
///
/// Base and helix topology is immutable after construction; the derived
/// data is (re)built by [`compute_aux_data`](Structure::compute_aux_data),
/// which clears every derived field before recomputing, so repeated runs
/// are idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    bases: Bases,
    helices: Helices,
    strands: Strands,
    #[serde(default, skip)]
    domains: Vec<Domain>,
}

impl Default for Structure {
    fn default() -> Self {
        Self::new("dna structure", Vec::new(), Vec::new(), Vec::new())
    }
}

impl Structure {
    pub fn new(
        name: impl Into<String>,
        bases: Vec<Base>,
        helices: Vec<Helix>,
        strands: Vec<Strand>,
    ) -> Self {
        Self {
            name: name.into(),
            bases: Bases::new(bases),
            helices: Helices::new(helices),
            strands: Strands::new(strands),
            domains: Vec::new(),
        }
    }

    pub fn bases(&self) -> &Bases {
        &self.bases
    }

    pub fn helices(&self) -> &Helices {
        &self.helices
    }

    pub fn strands(&self) -> &Strands {
        &self.strands
    }

    /// The derived domain list, empty until
    /// [`compute_aux_data`](Structure::compute_aux_data) has run.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn helix(&self, lattice_num: usize) -> Option<&Helix> {
        self.helices.get(lattice_num)
    }

    /// The helix at the given lattice coordinates, if any.
    pub fn helix_at(&self, row: i32, col: i32) -> Option<&Helix> {
        self.helices.at_coordinates(row, col)
    }

    /// Per-helix base array capacity: the staple and scaffold arrays of
    /// every helix share this length.
    fn capacity(&self) -> usize {
        self.helices
            .values()
            .map(|h| h.axis_nodes.len())
            .max()
            .unwrap_or(0)
    }

    /// Run the full derivation pipeline, rebuilding every derived field.
    pub fn compute_aux_data(&mut self) -> Result<(), StructureError> {
        log::debug!("computing auxiliary data for \"{}\"", self.name);
        self.clear_aux_data();
        self.attach_strand_helices()?;

        let capacity = self.capacity();
        helices::bucket_bases(&self.bases, &mut self.helices, capacity)?;

        let computed = domains::compute_domains(&mut self.bases, &self.helices, &self.strands)?;
        for domain in &computed {
            if let Some(helix) = self.helices.get_mut(domain.helix) {
                helix.domains.push(domain.id);
            }
        }
        self.domains = computed;

        for connection in connectivity::compute_adjacency(&self.helices)? {
            if let Some(helix) = self.helices.get_mut(connection.from_helix) {
                helix.connectivity.push(connection);
            }
        }

        let bases = &self.bases;
        for helix in self.helices.values_mut() {
            helix.compute_design_crossovers(bases)?;
        }
        Ok(())
    }

    /// The memoized domain list; the full derivation runs on first call.
    pub fn get_domains(&mut self) -> Result<&[Domain], StructureError> {
        if self.domains.is_empty() {
            self.compute_aux_data()?;
        }
        Ok(&self.domains)
    }

    /// Look up a strand by id.
    ///
    /// An absent id is reported via a logged error and a `None` return.
    /// The id index is built lazily on first use.
    pub fn get_strand(&mut self, id: usize) -> Option<&Strand> {
        self.strands.get(id)
    }

    fn clear_aux_data(&mut self) {
        self.domains.clear();
        for base in self.bases.iter_mut() {
            base.domain = None;
        }
        for helix in self.helices.values_mut() {
            helix.clear_aux_data();
        }
        for strand in self.strands.values_mut() {
            strand.helices.clear();
        }
    }

    /// Record, on each strand, the set of helices its tour passes through.
    fn attach_strand_helices(&mut self) -> Result<(), StructureError> {
        let bases = &self.bases;
        let helices = &self.helices;
        for strand in self.strands.values_mut() {
            for base_id in &strand.tour {
                let base = bases.try_get(*base_id)?;
                if helices.get(base.helix).is_none() {
                    return Err(StructureError::MalformedTopology(format!(
                        "strand {} visits unknown helix {}",
                        strand.id, base.helix
                    )));
                }
                strand.helices.insert(base.helix);
            }
        }
        Ok(())
    }
}
