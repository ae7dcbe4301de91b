//! Subband decomposition tree.
//!
//! A tile component is decomposed into a quad-tree of subbands: each split
//! turns a leaf into a node with four children (LL, HL, LH, HH) whose
//! geometry follows from the parent's canvas position alone. The tree is
//! built once, by splitting along the all-LL path, and is read-only with
//! respect to structure afterwards; the quantizer and entropy stages only
//! walk its leaves.
//!
//! Nodes live in an arena (`Vec<Subband>`) and refer to each other by index,
//! the same shape used for the packet-header tag trees.

use log::debug;

use crate::constants::{DEFAULT_CODE_BLOCK_HEIGHT, DEFAULT_CODE_BLOCK_WIDTH};
use crate::error::J2kError;
use crate::wavelet::filter::FilterId;

/// Orientation of a wavelet subband.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubbandOrientation {
    #[default]
    /// Low-Low (base image)
    LL,
    /// High-Low (horizontal details)
    HL,
    /// Low-High (vertical details)
    LH,
    /// High-High (diagonal details)
    HH,
}

/// One node of the decomposition tree.
///
/// Children partition the parent's area, with any extra row or column going
/// to the low-pass side. `ulcx`/`ulcy` track the canvas position at this
/// subband's decomposition grid, `ulx`/`uly` the pixel position within the
/// tile component.
#[derive(Debug, Clone)]
pub struct Subband {
    /// Whether this subband has been split into four children.
    pub is_node: bool,
    pub orientation: SubbandOrientation,
    /// Decomposition depth from the top of the tree (top is 0).
    pub level: u8,
    /// Resolution level this subband contributes to.
    pub res_lvl: u8,
    /// Subband index within its resolution level.
    pub sband_idx: u32,
    /// Upper-left corner on the canvas, horizontal.
    pub ulcx: u32,
    /// Upper-left corner on the canvas, vertical.
    pub ulcy: u32,
    /// Upper-left pixel position, horizontal.
    pub ulx: u32,
    /// Upper-left pixel position, vertical.
    pub uly: u32,
    pub width: u32,
    pub height: u32,
    /// Nominal code-block dimensions used to partition this subband.
    pub nom_cb_width: u32,
    pub nom_cb_height: u32,
    /// Base 2 exponent of the cumulative analysis gain.
    pub an_gain_exp: u8,
    /// Horizontal filter used to split this subband, once it is a node.
    pub h_filter: Option<FilterId>,
    /// Vertical filter used to split this subband, once it is a node.
    pub v_filter: Option<FilterId>,
    parent: Option<usize>,
    /// Children in LL, HL, LH, HH order.
    children: Option<[usize; 4]>,
}

/// Quad-tree of subbands for one tile component.
pub struct SubbandTree {
    nodes: Vec<Subband>,
}

impl SubbandTree {
    /// Builds the dyadic decomposition tree for a tile component.
    ///
    /// `width`/`height` are the component dimensions, `ulcx`/`ulcy` its
    /// upper-left corner on the reference canvas. The tree is split `levels`
    /// times along the all-LL path; the filter for each resolution level is
    /// taken from `h_filters`/`v_filters`, reusing the last entry when fewer
    /// filters than levels are supplied.
    pub fn new(
        width: u32,
        height: u32,
        ulcx: u32,
        ulcy: u32,
        levels: u8,
        h_filters: &[FilterId],
        v_filters: &[FilterId],
    ) -> Result<Self, J2kError> {
        Self::with_code_block_size(
            width,
            height,
            ulcx,
            ulcy,
            levels,
            h_filters,
            v_filters,
            DEFAULT_CODE_BLOCK_WIDTH,
            DEFAULT_CODE_BLOCK_HEIGHT,
        )
    }

    /// As `new`, with explicit nominal code-block dimensions.
    #[allow(clippy::too_many_arguments)]
    pub fn with_code_block_size(
        width: u32,
        height: u32,
        ulcx: u32,
        ulcy: u32,
        levels: u8,
        h_filters: &[FilterId],
        v_filters: &[FilterId],
        nom_cb_width: u32,
        nom_cb_height: u32,
    ) -> Result<Self, J2kError> {
        if h_filters.is_empty() || v_filters.is_empty() {
            return Err(J2kError::InvalidArgument(
                "at least one filter per direction is required".to_string(),
            ));
        }

        let root = Subband {
            is_node: false,
            orientation: SubbandOrientation::LL,
            level: 0,
            res_lvl: levels,
            sband_idx: 0,
            ulcx,
            ulcy,
            ulx: 0,
            uly: 0,
            width,
            height,
            nom_cb_width,
            nom_cb_height,
            an_gain_exp: 0,
            h_filter: None,
            v_filter: None,
            parent: None,
            children: None,
        };

        let mut tree = Self { nodes: vec![root] };
        let mut cur = 0;
        for _ in 0..levels {
            let r = tree.nodes[cur].res_lvl as usize;
            let hi = if r <= h_filters.len() {
                r - 1
            } else {
                h_filters.len() - 1
            };
            let vi = if r <= v_filters.len() {
                r - 1
            } else {
                v_filters.len() - 1
            };
            let [ll, _, _, _] = tree.split(cur, h_filters[hi], v_filters[vi])?;
            cur = ll;
        }

        debug!(
            "built {}x{} subband tree: {} levels, {} nodes",
            width,
            height,
            levels,
            tree.nodes.len()
        );
        Ok(tree)
    }

    /// Id of the top-level subband.
    pub fn root(&self) -> usize {
        0
    }

    /// Number of nodes in the tree, leaves included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of resolution levels described by this tree. A tree split
    /// `L` times has `L + 1` resolution levels, `0..=L`.
    pub fn resolution_levels(&self) -> u8 {
        self.nodes[0].res_lvl
    }

    /// The subband with id `id`. Ids are handed out by this tree; an id from
    /// another tree may be out of range and panics.
    pub fn get(&self, id: usize) -> &Subband {
        &self.nodes[id]
    }

    pub fn parent(&self, id: usize) -> Option<usize> {
        self.nodes[id].parent
    }

    /// Children of `id` in LL, HL, LH, HH order, if it has been split.
    pub fn children(&self, id: usize) -> Option<[usize; 4]> {
        self.nodes[id].children
    }

    fn child(&self, id: usize, k: usize) -> Option<usize> {
        self.nodes[id].children.map(|c| c[k])
    }

    /// Splits leaf `id` into its four children and returns their ids in
    /// LL, HL, LH, HH order.
    ///
    /// The low-pass side keeps the first sample whether its canvas
    /// coordinate is even or odd, hence the `(x+1)>>1` on the LL corner
    /// against the `x>>1` on the high-pass corner. Splitting a node twice,
    /// or splitting below resolution level 0, is an error.
    pub fn split(
        &mut self,
        id: usize,
        h_filter: FilterId,
        v_filter: FilterId,
    ) -> Result<[usize; 4], J2kError> {
        let p = self.nodes[id].clone();
        if p.is_node {
            return Err(J2kError::InvalidOperation(
                "subband has already been split".to_string(),
            ));
        }
        if p.orientation == SubbandOrientation::LL && p.res_lvl == 0 {
            return Err(J2kError::InvalidOperation(
                "no resolution levels left to split".to_string(),
            ));
        }

        let base = self.nodes.len();
        let child_level = p.level + 1;

        // LL keeps the parent's pixel position and takes the (possibly
        // larger) low-pass share of both dimensions.
        let ll_ulcx = (p.ulcx + 1) >> 1;
        let ll_ulcy = (p.ulcy + 1) >> 1;
        let ll_w = ((p.ulcx + p.width + 1) >> 1) - ll_ulcx;
        let ll_h = ((p.ulcy + p.height + 1) >> 1) - ll_ulcy;
        let ll = Subband {
            is_node: false,
            orientation: SubbandOrientation::LL,
            level: child_level,
            // Only the all-LL path moves down a resolution level.
            res_lvl: if p.orientation == SubbandOrientation::LL {
                p.res_lvl - 1
            } else {
                p.res_lvl
            },
            sband_idx: p.sband_idx << 2,
            ulcx: ll_ulcx,
            ulcy: ll_ulcy,
            ulx: p.ulx,
            uly: p.uly,
            width: ll_w,
            height: ll_h,
            nom_cb_width: p.nom_cb_width,
            nom_cb_height: p.nom_cb_height,
            an_gain_exp: p.an_gain_exp,
            h_filter: None,
            v_filter: None,
            parent: Some(id),
            children: None,
        };

        // HL: horizontal high-pass, vertical low-pass. Its width is the
        // remainder of the parent's columns.
        let hl_ulcx = p.ulcx >> 1;
        let hl_w = ((p.ulcx + p.width) >> 1) - hl_ulcx;
        let hl = Subband {
            is_node: false,
            orientation: SubbandOrientation::HL,
            level: child_level,
            res_lvl: p.res_lvl,
            sband_idx: (p.sband_idx << 2) + 1,
            ulcx: hl_ulcx,
            ulcy: ll_ulcy,
            ulx: p.ulx + ll_w,
            uly: p.uly,
            width: hl_w,
            height: ll_h,
            nom_cb_width: p.nom_cb_width,
            nom_cb_height: p.nom_cb_height,
            an_gain_exp: p.an_gain_exp + 1,
            h_filter: None,
            v_filter: None,
            parent: Some(id),
            children: None,
        };

        // LH: symmetric to HL with the axes swapped.
        let lh_ulcy = p.ulcy >> 1;
        let lh_h = ((p.ulcy + p.height) >> 1) - lh_ulcy;
        let lh = Subband {
            is_node: false,
            orientation: SubbandOrientation::LH,
            level: child_level,
            res_lvl: p.res_lvl,
            sband_idx: (p.sband_idx << 2) + 2,
            ulcx: ll_ulcx,
            ulcy: lh_ulcy,
            ulx: p.ulx,
            uly: p.uly + ll_h,
            width: ll_w,
            height: lh_h,
            nom_cb_width: p.nom_cb_width,
            nom_cb_height: p.nom_cb_height,
            an_gain_exp: p.an_gain_exp + 1,
            h_filter: None,
            v_filter: None,
            parent: Some(id),
            children: None,
        };

        // HH takes HL's horizontal extent and LH's vertical extent.
        let hh = Subband {
            is_node: false,
            orientation: SubbandOrientation::HH,
            level: child_level,
            res_lvl: p.res_lvl,
            sband_idx: (p.sband_idx << 2) + 3,
            ulcx: hl_ulcx,
            ulcy: lh_ulcy,
            ulx: p.ulx + ll_w,
            uly: p.uly + ll_h,
            width: hl_w,
            height: lh_h,
            nom_cb_width: p.nom_cb_width,
            nom_cb_height: p.nom_cb_height,
            an_gain_exp: p.an_gain_exp + 2,
            h_filter: None,
            v_filter: None,
            parent: Some(id),
            children: None,
        };

        self.nodes.push(ll);
        self.nodes.push(hl);
        self.nodes.push(lh);
        self.nodes.push(hh);

        let node = &mut self.nodes[id];
        node.is_node = true;
        node.h_filter = Some(h_filter);
        node.v_filter = Some(v_filter);
        node.children = Some([base, base + 1, base + 2, base + 3]);

        Ok([base, base + 1, base + 2, base + 3])
    }

    /// Next leaf within the same resolution level, in LL, HL, LH, HH order,
    /// or `None` at the last subband of the level.
    ///
    /// From an HH leaf the successor is found by climbing out of any chain
    /// of HH quadrants first and continuing from the first non-HH ancestor.
    pub fn next_subband(&self, id: usize) -> Result<Option<usize>, J2kError> {
        if self.nodes[id].is_node {
            return Err(J2kError::InvalidArgument(
                "next_subband applies to leaf subbands only".to_string(),
            ));
        }

        let mut cur = id;
        while self.nodes[cur].orientation == SubbandOrientation::HH {
            match self.nodes[cur].parent {
                Some(p) => cur = p,
                None => return Ok(None),
            }
        }

        let sb = &self.nodes[cur];
        let next = match sb.orientation {
            SubbandOrientation::LL => match sb.parent {
                // At the top level, or at the last subband of the lowest
                // resolution level, there is no successor.
                Some(p) if self.nodes[p].res_lvl == sb.res_lvl => self.child(p, 1),
                _ => None,
            },
            SubbandOrientation::HL => sb.parent.and_then(|p| self.child(p, 2)),
            SubbandOrientation::LH => sb.parent.and_then(|p| self.child(p, 3)),
            // Unreachable: the climb above stopped at a non-HH subband.
            SubbandOrientation::HH => None,
        };
        Ok(next)
    }

    /// First leaf of the next finer resolution level, or `None` from the
    /// finest level.
    pub fn next_res_level(&self, id: usize) -> Result<Option<usize>, J2kError> {
        if self.nodes[id].is_node {
            return Err(J2kError::InvalidArgument(
                "next_res_level applies to leaf subbands only".to_string(),
            ));
        }
        if self.nodes[id].level == 0 {
            // A tree that was never split has a single resolution level.
            return Ok(None);
        }

        // Climb until the resolution level changes.
        let rl = self.nodes[id].res_lvl;
        let mut cur = id;
        loop {
            match self.nodes[cur].parent {
                Some(p) => cur = p,
                None => return Ok(None),
            }
            if self.nodes[cur].res_lvl != rl {
                break;
            }
        }

        // Drop into the next level through HL, then follow LL to a leaf.
        let Some(mut cur) = self.child(cur, 1) else {
            return Ok(None);
        };
        while let Some(c) = self.child(cur, 0) {
            cur = c;
        }
        Ok(Some(cur))
    }

    /// The subband at (`res_lvl`, `sband_idx`), located from `id`.
    ///
    /// `sband_idx` is the index within the resolution level: 0 names the LL
    /// subband of level 0 (or the node spanning a higher level), 1 to 3 name
    /// HL, LH and HH. A resolution level above the starting subband's own is
    /// out of range.
    pub fn subband_by_idx(
        &self,
        id: usize,
        res_lvl: u8,
        sband_idx: u32,
    ) -> Result<usize, J2kError> {
        let mut cur = id;
        if res_lvl > self.nodes[cur].res_lvl {
            return Err(J2kError::InvalidArgument(format!(
                "resolution level {res_lvl} out of range"
            )));
        }

        // The requested subband may be the starting one.
        if res_lvl == self.nodes[cur].res_lvl && sband_idx == self.nodes[cur].sband_idx {
            return Ok(cur);
        }

        // Move onto the all-LL spine before descending.
        if self.nodes[cur].sband_idx != 0 {
            match self.nodes[cur].parent {
                Some(p) => cur = p,
                None => {
                    return Err(J2kError::InvalidArgument(format!(
                        "no subband with index {sband_idx} at resolution level {res_lvl}"
                    )));
                }
            }
        }
        while self.nodes[cur].res_lvl > res_lvl {
            match self.child(cur, 0) {
                Some(c) => cur = c,
                None => {
                    return Err(J2kError::InvalidArgument(format!(
                        "resolution level {res_lvl} out of range"
                    )));
                }
            }
        }

        match sband_idx {
            0 => Ok(cur),
            1..=3 => self.child(cur, sband_idx as usize).ok_or_else(|| {
                J2kError::InvalidArgument(format!(
                    "no subband with index {sband_idx} at resolution level {res_lvl}"
                ))
            }),
            _ => Err(J2kError::InvalidArgument(format!(
                "subband index {sband_idx} out of range"
            ))),
        }
    }

    /// The leaf containing pixel (`x`, `y`), located from `id`. The point
    /// must lie within the starting subband's extent.
    pub fn subband_at(&self, id: usize, x: u32, y: u32) -> Result<usize, J2kError> {
        {
            let sb = &self.nodes[id];
            if x < sb.ulx || y < sb.uly || x >= sb.ulx + sb.width || y >= sb.uly + sb.height {
                return Err(J2kError::InvalidArgument(format!(
                    "point ({x},{y}) lies outside the subband"
                )));
            }
        }

        let mut cur = id;
        while let Some(children) = self.nodes[cur].children {
            // The HH corner separates the four quadrants.
            let hh = &self.nodes[children[3]];
            cur = if x < hh.ulx {
                if y < hh.uly { children[0] } else { children[2] }
            } else if y < hh.uly {
                children[1]
            } else {
                children[3]
            };
        }
        Ok(cur)
    }

    /// The first leaf in packet-building order: the deepest all-LL subband.
    pub fn first_leaf(&self) -> usize {
        let mut cur = self.root();
        while let Some(c) = self.child(cur, 0) {
            cur = c;
        }
        cur
    }

    /// All leaves in packet-building order: resolution level 0 upwards,
    /// LL, HL, LH, HH within each level.
    pub fn leaves(&self) -> Leaves<'_> {
        let first = self.first_leaf();
        Leaves {
            tree: self,
            state: Some((first, first)),
        }
    }
}

/// Iterator over the leaves of a `SubbandTree` in packet-building order.
pub struct Leaves<'a> {
    tree: &'a SubbandTree,
    /// Current leaf and the first leaf of the current resolution level.
    state: Option<(usize, usize)>,
}

impl Iterator for Leaves<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let (cur, level_start) = self.state?;
        // The traversal errors apply to internal nodes only; this iterator
        // never leaves the leaves.
        self.state = match self.tree.next_subband(cur).ok().flatten() {
            Some(n) => Some((n, level_start)),
            None => self
                .tree
                .next_res_level(level_start)
                .ok()
                .flatten()
                .map(|n| (n, n)),
        };
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(w: u32, h: u32, levels: u8) -> SubbandTree {
        SubbandTree::new(
            w,
            h,
            0,
            0,
            levels,
            &[FilterId::Reversible5x3],
            &[FilterId::Reversible5x3],
        )
        .unwrap()
    }

    #[test]
    fn test_single_split_geometry() {
        let t = tree(5, 5, 1);
        let [ll, hl, lh, hh] = t.children(t.root()).unwrap();

        // 5 columns split 3 low / 2 high with an even origin.
        assert_eq!((t.get(ll).width, t.get(ll).height), (3, 3));
        assert_eq!((t.get(hl).width, t.get(hl).height), (2, 3));
        assert_eq!((t.get(lh).width, t.get(lh).height), (3, 2));
        assert_eq!((t.get(hh).width, t.get(hh).height), (2, 2));

        assert_eq!((t.get(hl).ulx, t.get(hl).uly), (3, 0));
        assert_eq!((t.get(lh).ulx, t.get(lh).uly), (0, 3));
        assert_eq!((t.get(hh).ulx, t.get(hh).uly), (3, 3));
    }

    #[test]
    fn test_odd_origin_flips_partition() {
        // With an odd canvas origin the first (kept) sample is high-indexed,
        // so 5 columns split 2 low / 3 high.
        let t = SubbandTree::new(
            5,
            5,
            1,
            1,
            1,
            &[FilterId::Reversible5x3],
            &[FilterId::Reversible5x3],
        )
        .unwrap();
        let [ll, hl, _, _] = t.children(t.root()).unwrap();
        assert_eq!(t.get(ll).width, 2);
        assert_eq!(t.get(hl).width, 3);
    }

    #[test]
    fn test_gain_exponents() {
        let t = tree(8, 8, 1);
        let [ll, hl, lh, hh] = t.children(t.root()).unwrap();
        assert_eq!(t.get(ll).an_gain_exp, 0);
        assert_eq!(t.get(hl).an_gain_exp, 1);
        assert_eq!(t.get(lh).an_gain_exp, 1);
        assert_eq!(t.get(hh).an_gain_exp, 2);
    }

    #[test]
    fn test_resolution_levels_decrease_on_ll_path() {
        let t = tree(64, 64, 3);
        assert_eq!(t.resolution_levels(), 3);

        let mut cur = t.root();
        for expected in (0u8..3).rev() {
            let [ll, hl, _, _] = t.children(cur).unwrap();
            assert_eq!(t.get(ll).res_lvl, expected);
            // High-pass children stay at the parent's resolution level.
            assert_eq!(t.get(hl).res_lvl, expected + 1);
            cur = ll;
        }
        assert!(!t.get(cur).is_node);
    }

    #[test]
    fn test_split_twice_rejected() {
        let mut t = tree(16, 16, 1);
        let err = t
            .split(t.root(), FilterId::Reversible5x3, FilterId::Reversible5x3)
            .unwrap_err();
        assert!(matches!(err, J2kError::InvalidOperation(_)));
    }

    #[test]
    fn test_split_below_level_zero_rejected() {
        let mut t = tree(16, 16, 2);
        let leaf = t.first_leaf();
        assert_eq!(t.get(leaf).res_lvl, 0);
        let err = t
            .split(leaf, FilterId::Reversible5x3, FilterId::Reversible5x3)
            .unwrap_err();
        assert!(matches!(err, J2kError::InvalidOperation(_)));
    }

    #[test]
    fn test_filters_recorded_on_nodes() {
        let t = SubbandTree::new(
            32,
            32,
            0,
            0,
            2,
            &[FilterId::Reversible5x3, FilterId::Irreversible9x7],
            &[FilterId::Reversible5x3, FilterId::Irreversible9x7],
        )
        .unwrap();
        // The root splits at resolution level 2; with two supplied filters
        // the last one is reused there, and filter 0 applies at level 1.
        assert_eq!(t.get(t.root()).h_filter, Some(FilterId::Irreversible9x7));
        let [ll, _, _, _] = t.children(t.root()).unwrap();
        assert_eq!(t.get(ll).h_filter, Some(FilterId::Reversible5x3));
    }

    #[test]
    fn test_leaves_iterator_order() {
        let t = tree(64, 64, 2);
        let names: Vec<(u8, SubbandOrientation)> = t
            .leaves()
            .map(|id| (t.get(id).res_lvl, t.get(id).orientation))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, SubbandOrientation::LL),
                (1, SubbandOrientation::HL),
                (1, SubbandOrientation::LH),
                (1, SubbandOrientation::HH),
                (2, SubbandOrientation::HL),
                (2, SubbandOrientation::LH),
                (2, SubbandOrientation::HH),
            ]
        );
    }

    #[test]
    fn test_zero_level_tree() {
        let t = tree(16, 16, 0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.resolution_levels(), 0);
        assert_eq!(t.leaves().collect::<Vec<_>>(), vec![t.root()]);
        assert_eq!(t.next_subband(t.root()).unwrap(), None);
        assert_eq!(t.next_res_level(t.root()).unwrap(), None);
    }
}
