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

use thiserror::Error;

/// Errors raised by the derivation pipeline.
///
/// Malformed topology is fatal to the whole derivation: a dangling link can
/// corrupt every domain and crossover computed after it, so the pipeline
/// stops at the first detection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The base connectivity violates the input contract.
    #[error("malformed topology: {0}")]
    MalformedTopology(String),
    /// The helix geometry does not allow a direction to be computed.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
