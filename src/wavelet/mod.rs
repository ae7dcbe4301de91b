//! Wavelet decomposition structures.
//!
//! This module describes how a tile component is decomposed into subbands
//! and which filters drive that decomposition:
//!
//! - `filter`: filter capability descriptors (tap supports, reversibility,
//!   implementation kind) and the built-in 9/7 and 5/3 filters.
//! - `spec`: the per-component decomposition and filter specification
//!   hierarchy (main default with component overrides).
//! - `subband`: the subband quad-tree, its split geometry and the traversal
//!   operations used to linearize leaves for packet building.

pub mod filter;
pub mod spec;
pub mod subband;

pub use filter::{Filter53, Filter97, FilterId, FilterImplementation, SampleType, WaveletFilter};
pub use spec::{DecompSpec, DecompType, FilterSpec, SpecTier};
pub use subband::{Leaves, Subband, SubbandOrientation, SubbandTree};

use crate::error::J2kError;

/// Builds the subband tree for one component of a tile, resolving the
/// decomposition and filter specifications for that component.
///
/// Only the dyadic decomposition with the built-in filters is supported by
/// the transform stages; anything else resolves but fails fast here.
pub fn build_component_tree(
    decomp: &DecompSpec,
    filters: &FilterSpec,
    component: usize,
    width: u32,
    height: u32,
    ulcx: u32,
    ulcy: u32,
) -> Result<SubbandTree, J2kError> {
    match decomp.decomp_type(component)? {
        DecompType::Dyadic => {}
        DecompType::Packet => {
            return Err(J2kError::NotImplemented("packet decomposition"));
        }
    }

    let filter = filters.filter(component)?;
    if filter.descriptor().is_none() {
        return Err(J2kError::NotImplemented("custom filter decomposition"));
    }

    let levels = decomp.levels(component)?;
    SubbandTree::new(width, height, ulcx, ulcy, levels, &[filter], &[filter])
}
