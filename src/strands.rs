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

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::bases::BaseId;

/// A strand of the design: a scaffold or staple winding its way through the
/// virtual helices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strand {
    pub id: usize,
    /// The ordered list of base ids defining the strand's path, 5'→3'.
    pub tour: Vec<BaseId>,
    pub is_scaffold: bool,
    /// Whether the tour closes into a loop (the last base's 3' link points
    /// back at the first). Set by the loader and read by consumers such as
    /// visualization layers; the derivation itself handles circular tours
    /// through the base links alone.
    #[serde(default)]
    pub is_circular: bool,
    /// Colour of the strand, as a 0xRRGGBB value. Domains inherit it.
    pub color: u32,
    /// The helices this strand passes through, filled by
    /// [`Structure::compute_aux_data`](crate::Structure::compute_aux_data).
    #[serde(default, skip)]
    pub helices: BTreeSet<usize>,
}

impl Strand {
    pub fn new(id: usize, tour: Vec<BaseId>, is_scaffold: bool, color: u32) -> Self {
        Self {
            id,
            tour,
            is_scaffold,
            is_circular: false,
            color,
            helices: BTreeSet::new(),
        }
    }
}

/// The strand arena, with a lazily built id index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Strands {
    list: Vec<Strand>,
    #[serde(default, skip)]
    index: AHashMap<usize, usize>,
}

impl Strands {
    pub fn new(list: Vec<Strand>) -> Self {
        Self {
            list,
            index: AHashMap::new(),
        }
    }

    /// Look up a strand by id, building the id index on first use.
    ///
    /// An absent id is reported with a logged error and a `None` return;
    /// callers must check before use.
    pub fn get(&mut self, id: usize) -> Option<&Strand> {
        if self.index.is_empty() {
            for (i, strand) in self.list.iter().enumerate() {
                self.index.insert(strand.id, i);
            }
        }
        match self.index.get(&id) {
            Some(i) => self.list.get(*i),
            None => {
                log::error!("failed to find strand id {}", id);
                None
            }
        }
    }

    /// Id lookup that leaves the lazy index untouched.
    pub(crate) fn find(&self, id: usize) -> Option<&Strand> {
        self.list.iter().find(|s| s.id == id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Strand> {
        self.list.iter()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Strand> {
        self.list.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
