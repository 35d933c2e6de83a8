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

use super::*;
use std::collections::HashMap;
use ultraviolet::{Mat3, Vec3};

const Z_STEP: f32 = 0.332;
const HELIX_SPACING: f32 = 2.65;

/// A straight helix along the x axis, offset on the yz plane by its lattice
/// coordinates.
fn straight_helix(num: usize, row: i32, col: i32, polarity: Polarity, size: usize) -> Helix {
    let y = row as f32 * HELIX_SPACING;
    let z = col as f32 * HELIX_SPACING;
    let axis_nodes = (0..size)
        .map(|p| Vec3::new(p as f32 * Z_STEP, y, z))
        .collect();
    // Right-handed frame with the long axis (column 2) along x.
    let frame = Mat3::new(Vec3::unit_y(), Vec3::unit_z(), Vec3::unit_x());
    let ends = [
        Vec3::new(0., y, z),
        Vec3::new((size as f32 - 1.) * Z_STEP, y, z),
    ];
    Helix::new(num, row, col, polarity, axis_nodes, ends, [frame, frame])
}

fn asc(helix: usize, from: usize, to: usize) -> Vec<(usize, usize)> {
    (from..=to).map(|p| (helix, p)).collect()
}

fn desc(helix: usize, from: usize, to: usize) -> Vec<(usize, usize)> {
    (to..=from).rev().map(|p| (helix, p)).collect()
}

#[derive(Default)]
struct DesignBuilder {
    bases: Vec<Base>,
    strands: Vec<Strand>,
}

impl DesignBuilder {
    /// Add a strand visiting `(helix, position)` stops in 5'→3' order,
    /// linking consecutive bases.
    fn strand(&mut self, id: usize, is_scaffold: bool, stops: &[(usize, usize)]) -> Vec<BaseId> {
        let first = self.bases.len() + 1;
        let tour: Vec<BaseId> = (0..stops.len()).map(|k| BaseId(first + k)).collect();
        for (k, &(helix, position)) in stops.iter().enumerate() {
            let mut base = Base::new(tour[k], helix, position, id, is_scaffold);
            if k > 0 {
                base.up = Some(tour[k - 1]);
            }
            if k + 1 < stops.len() {
                base.down = Some(tour[k + 1]);
            }
            self.bases.push(base);
        }
        self.strands
            .push(Strand::new(id, tour.clone(), is_scaffold, 0xf74308));
        tour
    }

    /// Like `strand`, with the tour closed into a loop.
    fn circular_strand(
        &mut self,
        id: usize,
        is_scaffold: bool,
        stops: &[(usize, usize)],
    ) -> Vec<BaseId> {
        let tour = self.strand(id, is_scaffold, stops);
        if let (Some(&first), Some(&last)) = (tour.first(), tour.last()) {
            self.bases[first.0 - 1].up = Some(last);
            self.bases[last.0 - 1].down = Some(first);
        }
        self.strands.last_mut().unwrap().is_circular = true;
        tour
    }

    fn base_at(&self, helix: usize, position: usize, is_scaffold: bool) -> BaseId {
        self.bases
            .iter()
            .find(|b| b.helix == helix && b.position == position && b.is_scaffold == is_scaffold)
            .map(|b| b.id)
            .unwrap()
    }

    /// Pair the staple and scaffold bases sharing a helix position.
    fn pair_at(&mut self, helix: usize, position: usize) {
        let staple = self.base_at(helix, position, false);
        let scaffold = self.base_at(helix, position, true);
        self.bases[staple.0 - 1].across = Across::Paired {
            base: scaffold,
            orientation: PairingOrientation::Antiparallel,
        };
        self.bases[scaffold.0 - 1].across = Across::Paired {
            base: staple,
            orientation: PairingOrientation::Antiparallel,
        };
    }

    fn cut_up_link(&mut self, id: BaseId) {
        self.bases[id.0 - 1].up = None;
    }

    fn build(self, helices: Vec<Helix>) -> Structure {
        Structure::new("test structure", self.bases, helices, self.strands)
    }
}

/// Two helices stacked on the square lattice, ten positions each, fully
/// paired. One staple runs along helix 0 and crosses to helix 1 at position
/// 5; two more staples cover the remaining positions of each helix.
///
/// When `with_return_link` is false, helix 1 is entered through the 3' link
/// only: the crossing base's 5' link on helix 1 is absent.
fn two_helix_origami(with_return_link: bool) -> Structure {
    let mut design = DesignBuilder::default();
    // Scaffold polarity is 3' on helix 0 (5'→3' runs position-descending)
    // and 5' on helix 1.
    design.strand(1, true, &desc(0, 9, 0));
    design.strand(2, true, &asc(1, 0, 9));

    let mut stops = asc(0, 0, 5);
    stops.extend(desc(1, 5, 0));
    let crossing_tour = design.strand(3, false, &stops);
    design.strand(4, false, &asc(0, 6, 9));
    design.strand(5, false, &desc(1, 9, 6));
    if !with_return_link {
        design.cut_up_link(crossing_tour[6]);
    }

    for h in 0..2 {
        for p in 0..10 {
            design.pair_at(h, p);
        }
    }
    design.build(vec![
        straight_helix(0, 0, 0, Polarity::ThreePrime, 10),
        straight_helix(1, 1, 0, Polarity::FivePrime, 10),
    ])
}

/// One helix, bases at positions 0..=9 on both strand roles, with an
/// unpaired run at positions 4 and 5.
fn single_helix_with_gap() -> Structure {
    let mut design = DesignBuilder::default();
    design.strand(1, true, &desc(0, 9, 0));
    design.strand(2, false, &asc(0, 0, 9));
    for p in 0..10 {
        if p != 4 && p != 5 {
            design.pair_at(0, p);
        }
    }
    design.build(vec![straight_helix(0, 0, 0, Polarity::ThreePrime, 10)])
}

fn connection<'a>(structure: &'a Structure, from: usize, to: usize) -> &'a HelixConnection {
    structure
        .helix(from)
        .unwrap()
        .connectivity()
        .iter()
        .find(|c| c.to_helix == to)
        .unwrap()
}

fn positions(structure: &Structure, domain: &Domain) -> Vec<usize> {
    domain
        .bases
        .iter()
        .map(|id| structure.bases().get(*id).unwrap().position)
        .collect()
}

/// The `(min, max)` position spans of a helix's domains for one strand
/// role, sorted.
fn role_spans(structure: &Structure, helix: usize, is_scaffold: bool) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = structure
        .domains()
        .iter()
        .filter(|d| {
            d.helix == helix
                && structure.bases().get(d.bases[0]).unwrap().is_scaffold == is_scaffold
        })
        .map(|d| {
            let pos = positions(structure, d);
            (
                *pos.iter().min().unwrap(),
                *pos.iter().max().unwrap(),
            )
        })
        .collect();
    spans.sort_unstable();
    spans
}

#[test]
fn boundaries_at_single_stranded_region() {
    let mut structure = single_helix_with_gap();
    structure.compute_aux_data().unwrap();

    assert_eq!(structure.domains().len(), 6);
    for &is_scaffold in [false, true].iter() {
        assert_eq!(
            role_spans(&structure, 0, is_scaffold),
            vec![(0, 3), (4, 5), (6, 9)]
        );
    }

    // The middle domains are fully single stranded and pair with nothing.
    for domain in structure.domains() {
        let span = positions(&structure, domain);
        if span.contains(&4) {
            assert_eq!(domain.connected_strand, None);
            assert_eq!(domain.connected_domain, None);
        } else {
            assert!(domain.connected_strand.is_some());
            assert!(domain.connected_domain.is_some());
        }
    }
}

#[test]
fn every_base_in_exactly_one_domain() {
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();

    let mut membership: HashMap<BaseId, usize> = HashMap::new();
    for domain in structure.domains() {
        for base_id in &domain.bases {
            *membership.entry(*base_id).or_insert(0) += 1;
            assert_eq!(
                structure.bases().get(*base_id).unwrap().domain,
                Some(domain.id)
            );
        }
    }
    assert_eq!(membership.len(), structure.bases().len());
    assert!(membership.values().all(|count| *count == 1));
}

#[test]
fn two_helix_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();

    // Two domains per helix per strand role, split at position 5.
    assert_eq!(structure.domains().len(), 8);
    for h in 0..2 {
        assert_eq!(structure.helix(h).unwrap().domains().len(), 4);
        for &is_scaffold in [false, true].iter() {
            assert_eq!(
                role_spans(&structure, h, is_scaffold),
                vec![(0, 5), (6, 9)]
            );
        }
    }

    // One crossover on the 0→1 connection, none on the return direction.
    let forward = connection(&structure, 0, 1);
    assert_eq!(forward.crossovers.len(), 1);
    let crossover = &forward.crossovers[0];
    assert_eq!(crossover.helix, 0);
    assert_eq!(crossover.to_helix, 1);
    assert_eq!(crossover.strand, 3);
    let crossing_base = structure.bases().get(crossover.base).unwrap();
    assert_eq!((crossing_base.helix, crossing_base.position), (0, 5));
    assert!(connection(&structure, 1, 0).crossovers.is_empty());

    // Directions point from one helix toward the other.
    assert!((forward.direction - Vec3::unit_y()).mag() < 1e-6);
    assert!((connection(&structure, 1, 0).direction + Vec3::unit_y()).mag() < 1e-6);
}

#[test]
fn crossovers_are_recorded_per_direction_traversed() {
    let mut structure = two_helix_origami(true);
    structure.compute_aux_data().unwrap();

    // With the return link present, each direction independently records
    // its own crossover for the matching base.
    assert_eq!(connection(&structure, 0, 1).crossovers.len(), 1);
    let back = connection(&structure, 1, 0);
    assert_eq!(back.crossovers.len(), 1);
    let base = structure.bases().get(back.crossovers[0].base).unwrap();
    assert_eq!((base.helix, base.position), (1, 5));
}

#[test]
fn domain_base_lists_follow_strand_order() {
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();

    // The crossing staple's helix-0 domain reads exactly like its tour.
    let staple_tour = structure.get_strand(3).unwrap().tour.clone();
    let staple_domain = structure
        .domains()
        .iter()
        .find(|d| d.helix == 0 && d.strand == 3)
        .unwrap();
    assert_eq!(staple_domain.bases, staple_tour[..6].to_vec());

    // The helix-0 scaffold runs position-descending (3' polarity): its
    // domains read 5'→3' even though storage order is position-ascending.
    let scaffold_tour = structure.get_strand(1).unwrap().tour.clone();
    let scaffold_domain = structure
        .domains()
        .iter()
        .find(|d| d.strand == 1 && positions(&structure, d).contains(&9))
        .unwrap();
    assert_eq!(scaffold_domain.bases, scaffold_tour[..4].to_vec());
    assert_eq!(positions(&structure, scaffold_domain), vec![9, 8, 7, 6]);
}

#[test]
fn domain_pairing_is_resolved_across_strands() {
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();

    let staple_domain = structure
        .domains()
        .iter()
        .find(|d| d.helix == 0 && d.strand == 3)
        .unwrap();
    assert_eq!(staple_domain.connected_strand, Some(1));
    let connected = staple_domain.connected_domain.unwrap();
    let scaffold_domain = &structure.domains()[connected.0];
    assert_eq!(scaffold_domain.strand, 1);
    assert_eq!(scaffold_domain.helix, 0);
}

#[test]
fn domain_pairing_is_idempotent() {
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();

    let mut resolved = structure.domains().to_vec();
    crate::domains::resolve_domain_pairing(structure.bases(), &mut resolved).unwrap();
    for (before, after) in structure.domains().iter().zip(resolved.iter()) {
        assert_eq!(before.connected_strand, after.connected_strand);
        assert_eq!(before.connected_domain, after.connected_domain);
    }
}

#[test]
fn adjacency_is_lattice_local() {
    let mut design = DesignBuilder::default();
    let mut helices = Vec::new();
    for num in 0..9 {
        let row = (num / 3) as i32;
        let col = (num % 3) as i32;
        helices.push(straight_helix(num, row, col, Polarity::ThreePrime, 4));
        design.strand(num * 2 + 1, true, &desc(num, 3, 0));
        design.strand(num * 2 + 2, false, &asc(num, 0, 3));
        for p in 0..4 {
            design.pair_at(num, p);
        }
    }
    let mut structure = design.build(helices);
    structure.compute_aux_data().unwrap();

    // 12 shared edges on a 3×3 grid, one connection per direction.
    let total: usize = structure
        .helices()
        .values()
        .map(|h| h.connectivity().len())
        .sum();
    assert_eq!(total, 24);

    for h1 in structure.helices().values() {
        for h2 in structure.helices().values() {
            let manhattan = (h1.lattice_row - h2.lattice_row).abs()
                + (h1.lattice_col - h2.lattice_col).abs();
            let connected = h1
                .connectivity()
                .iter()
                .any(|c| c.to_helix == h2.lattice_num);
            assert_eq!(connected, manhattan == 1);
        }
    }

    // Every direction is a unit vector.
    for helix in structure.helices().values() {
        for c in helix.connectivity() {
            assert!((c.direction.mag() - 1.).abs() < 1e-6);
        }
    }
}

#[test]
fn circular_staple_forms_a_single_domain() {
    let mut design = DesignBuilder::default();
    design.strand(1, true, &desc(0, 9, 0));
    let loop_tour = design.circular_strand(2, false, &asc(0, 0, 9));
    for p in 0..10 {
        design.pair_at(0, p);
    }
    let mut structure = design.build(vec![straight_helix(0, 0, 0, Polarity::ThreePrime, 10)]);
    structure.compute_aux_data().unwrap();

    assert!(structure.get_strand(2).unwrap().is_circular);
    // The closed tour has no strand ends of its own: the only boundaries
    // come from the scaffold ends, so each role keeps one full-span domain.
    assert_eq!(structure.domains().len(), 2);
    let loop_domain = structure
        .domains()
        .iter()
        .find(|d| d.strand == 2)
        .unwrap();
    assert_eq!(loop_domain.bases, loop_tour);
}

#[test]
fn strand_lookup_reports_absent_ids() {
    let mut structure = two_helix_origami(false);
    assert!(structure.get_strand(9999).is_none());
    let strand = structure.get_strand(3).unwrap();
    assert_eq!(strand.id, 3);
    assert!(!strand.is_scaffold);
}

#[test]
fn strands_know_their_helices() {
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();
    let crossing: Vec<usize> = structure
        .get_strand(3)
        .unwrap()
        .helices
        .iter()
        .copied()
        .collect();
    assert_eq!(crossing, vec![0, 1]);
    let local: Vec<usize> = structure
        .get_strand(4)
        .unwrap()
        .helices
        .iter()
        .copied()
        .collect();
    assert_eq!(local, vec![0]);
}

#[test]
fn get_domains_memoizes() {
    let mut structure = two_helix_origami(false);
    assert!(structure.domains().is_empty());
    let count = structure.get_domains().unwrap().len();
    assert_eq!(count, 8);
    // A second call serves the memoized list.
    assert_eq!(structure.get_domains().unwrap().len(), count);
}

#[test]
fn recomputation_is_idempotent() {
    let mut structure = two_helix_origami(false);
    structure.compute_aux_data().unwrap();
    let domains = structure.domains().to_vec();
    let crossovers: Vec<usize> = structure
        .helices()
        .values()
        .flat_map(|h| h.connectivity().iter().map(|c| c.crossovers.len()))
        .collect();

    structure.compute_aux_data().unwrap();
    assert_eq!(structure.domains(), &domains[..]);
    let recomputed: Vec<usize> = structure
        .helices()
        .values()
        .flat_map(|h| h.connectivity().iter().map(|c| c.crossovers.len()))
        .collect();
    assert_eq!(recomputed, crossovers);
}

#[test]
fn helix_without_staples_is_malformed() {
    let mut design = DesignBuilder::default();
    design.strand(1, true, &desc(0, 3, 0));
    let mut structure = design.build(vec![straight_helix(0, 0, 0, Polarity::ThreePrime, 4)]);
    let err = structure.compute_aux_data().unwrap_err();
    match err {
        StructureError::MalformedTopology(msg) => assert!(msg.contains("helix 0")),
        other => panic!("expected MalformedTopology, got {:?}", other),
    }
}

#[test]
fn zero_length_axis_is_degenerate() {
    let mut design = DesignBuilder::default();
    design.strand(1, true, &desc(0, 9, 0));
    design.strand(2, true, &asc(1, 0, 9));
    design.strand(3, false, &asc(0, 0, 9));
    design.strand(4, false, &desc(1, 9, 0));
    for h in 0..2 {
        for p in 0..10 {
            design.pair_at(h, p);
        }
    }
    let zero_frame = Mat3::new(Vec3::zero(), Vec3::zero(), Vec3::zero());
    let mut helix0 = straight_helix(0, 0, 0, Polarity::ThreePrime, 10);
    let mut helix1 = straight_helix(1, 1, 0, Polarity::FivePrime, 10);
    helix0.end_frames = [zero_frame; 2];
    helix1.end_frames = [zero_frame; 2];
    let mut structure = design.build(vec![helix0, helix1]);
    let err = structure.compute_aux_data().unwrap_err();
    assert!(matches!(err, StructureError::DegenerateGeometry(_)));
}

#[test]
fn helix_lookup_by_coordinates() {
    let structure = two_helix_origami(false);
    assert_eq!(structure.helix_at(1, 0).map(|h| h.lattice_num), Some(1));
    assert!(structure.helix_at(5, 5).is_none());
}
