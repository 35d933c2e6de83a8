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

//! Domain computation.
//!
//! Domains are computed from the per-helix base arrays, traversed from
//! position 0 regardless of the helix polarity. A boolean array of strand
//! breaks marks every position where a strand changes its binding: it
//! crosses over to another helix, begins or ends, or becomes single
//! stranded. Pairs of break positions then delimit the domains.

use std::fmt;

use crate::bases::{Base, BaseId, Bases};
use crate::errors::StructureError;
use crate::helices::{Helices, Helix, StrandRole};
use crate::strands::Strands;

/// Identifier of a domain. Domains are numbered in creation order, starting
/// from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainId(pub usize);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A maximal contiguous run of bases of one strand within one helix,
/// delimited by two topology-changing positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    /// `lattice_num` of the owning helix.
    pub helix: usize,
    /// Id of the owning strand.
    pub strand: usize,
    /// Colour inherited from the owning strand.
    pub color: u32,
    /// The bases of the domain, in 5'→3' strand order. This may be
    /// position-reversed with respect to the helix storage order.
    pub bases: Vec<BaseId>,
    /// Strand on the complementary side of the first paired base, if any.
    pub connected_strand: Option<usize>,
    /// Domain on the complementary side of the first paired base, if any.
    pub connected_domain: Option<DomainId>,
}

impl Domain {
    /// First and last base of the domain in strand order.
    pub fn end_bases(&self) -> Option<(BaseId, BaseId)> {
        Some((*self.bases.first()?, *self.bases.last()?))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[D{} H{} S{}: {} bases]",
            self.id,
            self.helix,
            self.strand,
            self.bases.len()
        )
    }
}

/// Compute the domains of every helix, stamping each base with its owning
/// domain.
///
/// The staple and scaffold arrays of a helix accumulate breaks into the
/// same shared array, staple first: a break contributed by either strand
/// role is a structural boundary for the whole helix position.
pub(crate) fn compute_domains(
    bases: &mut Bases,
    helices: &Helices,
    strands: &Strands,
) -> Result<Vec<Domain>, StructureError> {
    let mut domains: Vec<Domain> = Vec::new();
    for helix in helices.values() {
        log::debug!("computing domains of helix {}", helix.lattice_num);
        let mut breaks = vec![false; helix.scaffold_bases().len()];
        set_strand_breaks(bases, helix, StrandRole::Staple, &mut breaks)?;
        set_strand_breaks(bases, helix, StrandRole::Scaffold, &mut breaks)?;

        for &role in [StrandRole::Staple, StrandRole::Scaffold].iter() {
            collect_role_domains(bases, strands, helix, role, &breaks, &mut domains)?;
        }
    }
    log::info!("created {} domains", domains.len());

    resolve_domain_pairing(bases, &mut domains)?;
    Ok(domains)
}

/// Turn one role's break pairs into domains, appended to `domains`.
fn collect_role_domains(
    bases: &mut Bases,
    strands: &Strands,
    helix: &Helix,
    role: StrandRole,
    breaks: &[bool],
    domains: &mut Vec<Domain>,
) -> Result<(), StructureError> {
    // Scaffold bases are inserted in reverse when the helix's intrinsic
    // traversal direction disagrees with strand direction, so that the base
    // list always reads 5'→3'.
    let three_to_five = helix.scaffold_polarity.is_three_to_five();
    let reverse = match role {
        StrandRole::Scaffold => three_to_five,
        StrandRole::Staple => !three_to_five,
    };
    let base_list = helix.base_array(role);

    let mut start: Option<usize> = None;
    for i in 0..breaks.len() {
        if !(breaks[i] && base_list[i].is_some()) {
            continue;
        }
        if let Some(s) = start.take() {
            let id = DomainId(domains.len());
            let mut members = Vec::new();
            for slot in &base_list[s..=i] {
                if let Some(base_id) = slot {
                    members.push(*base_id);
                    bases
                        .get_mut(*base_id)
                        .ok_or_else(|| {
                            StructureError::MalformedTopology(format!(
                                "base id {} is outside the structure's base range",
                                base_id
                            ))
                        })?
                        .domain = Some(id);
                }
            }
            if reverse {
                members.reverse();
            }
            let first = members.first().copied().ok_or_else(|| {
                StructureError::MalformedTopology(format!(
                    "empty domain span {}..={} in helix {}",
                    s, i, helix.lattice_num
                ))
            })?;
            let strand_id = bases.try_get(first)?.strand;
            let strand = strands.find(strand_id).ok_or_else(|| {
                StructureError::MalformedTopology(format!(
                    "base {} references unknown strand {}",
                    first, strand_id
                ))
            })?;
            log::debug!(
                "domain {}: helix {} positions {}..={}",
                id,
                helix.lattice_num,
                s,
                i
            );
            domains.push(Domain {
                id,
                helix: helix.lattice_num,
                strand: strand_id,
                color: strand.color,
                bases: members,
                connected_strand: None,
                connected_domain: None,
            });
        } else {
            start = Some(i);
        }
    }
    Ok(())
}

/// Mark in `breaks` every position of one role's base array where a strand
/// changes its binding.
///
/// A strand break occurs when a strand crosses over to another helix,
/// begins or ends, or becomes single stranded. The first non-empty position
/// is always a boundary. The crossover/end test takes priority over the
/// pairing test at a given position; a pairing flip marks both the previous
/// and the current position, a crossover only the current one.
fn set_strand_breaks(
    bases: &Bases,
    helix: &Helix,
    role: StrandRole,
    breaks: &mut [bool],
) -> Result<(), StructureError> {
    let base_list = helix.base_array(role);
    let (start_pos, first_id) = base_list
        .iter()
        .enumerate()
        .find_map(|(i, slot)| slot.map(|id| (i, id)))
        .ok_or_else(|| {
            StructureError::MalformedTopology(format!(
                "no starting base found in helix {} ({:?} array)",
                helix.lattice_num, role
            ))
        })?;
    let first = bases.try_get(first_id)?;
    let mut paired = first.across.is_paired();
    breaks[start_pos] = true;

    for i in (start_pos + 1)..base_list.len() {
        let base = match base_list[i] {
            Some(id) => bases.try_get(id)?,
            None => continue,
        };
        if base_changes_helix(bases, base)? {
            paired = base.across.is_paired();
            breaks[i] = true;
        } else if base.across.is_paired() != paired {
            // A pairing change signals a single strand starting or ending.
            paired = base.across.is_paired();
            breaks[i - 1] = true;
            breaks[i] = true;
        }
    }
    Ok(())
}

/// Crossover/end test: true when the base starts or ends its strand, or
/// when either of its strand neighbours lives on another helix.
fn base_changes_helix(bases: &Bases, base: &Base) -> Result<bool, StructureError> {
    let down = match base.down {
        Some(id) => bases.try_get(id)?,
        None => return Ok(true),
    };
    if down.helix != base.helix {
        return Ok(true);
    }
    let up = match base.up {
        Some(id) => bases.try_get(id)?,
        None => return Ok(true),
    };
    Ok(up.helix != base.helix)
}

/// Record, for every domain, the strand and domain on the complementary
/// side of its first paired base.
///
/// Fully single-stranded domains keep both fields at `None`. This is a pure
/// function of the `across` links and is safe to run repeatedly.
pub(crate) fn resolve_domain_pairing(
    bases: &Bases,
    domains: &mut [Domain],
) -> Result<(), StructureError> {
    for domain in domains.iter_mut() {
        let mut connected_strand = None;
        let mut connected_domain = None;
        for base_id in &domain.bases {
            let base = bases.try_get(*base_id)?;
            if let Some(across_id) = base.across.paired_base() {
                let across = bases.try_get(across_id)?;
                connected_strand = Some(across.strand);
                connected_domain = across.domain;
                break;
            }
        }
        domain.connected_strand = connected_strand;
        domain.connected_domain = connected_domain;
    }
    Ok(())
}
