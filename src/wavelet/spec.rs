//! Decomposition and filter specification hierarchy.
//!
//! JPEG 2000 resolves coding parameters through a most-specific-wins
//! hierarchy: a main default for the whole image, optional per-component
//! overrides, and (in the full standard) per-tile and per-tile-component
//! overrides. The rest of this codec assumes one decomposition per whole
//! image, so only the first two tiers are functional; the tile tiers are
//! declared and fail fast.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::{MAXIMUM_COMPONENT_COUNT, MAXIMUM_DECOMPOSITION_LEVELS};
use crate::error::J2kError;
use crate::wavelet::filter::{FilterId, SampleType};

/// Wavelet decomposition structure applied to a tile component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum DecompType {
    /// Dyadic (Mallat) decomposition: only the LL subband is split further.
    Dyadic = 0,
    /// Packet decomposition: high-pass subbands are split as well.
    Packet = 1,
}

/// Which tier of the hierarchy supplied a component's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecTier {
    MainDefault,
    ComponentDefault,
}

#[derive(Debug, Clone, Copy)]
enum ComponentDecomp {
    MainDefault,
    ComponentDefault { decomp_type: DecompType, levels: u8 },
}

/// Per-component resolution of decomposition type and level count.
#[derive(Debug, Clone)]
pub struct DecompSpec {
    main_decomp_type: DecompType,
    main_levels: u8,
    components: Vec<ComponentDecomp>,
}

impl DecompSpec {
    /// Creates a specification for `component_count` components, all
    /// inheriting the main default.
    pub fn new(
        component_count: usize,
        main_decomp_type: DecompType,
        main_levels: u8,
    ) -> Result<Self, J2kError> {
        validate_component_count(component_count)?;
        validate_levels(main_levels)?;
        Ok(Self {
            main_decomp_type,
            main_levels,
            components: vec![ComponentDecomp::MainDefault; component_count],
        })
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn main_decomp_type(&self) -> DecompType {
        self.main_decomp_type
    }

    pub fn main_levels(&self) -> u8 {
        self.main_levels
    }

    /// Records a component-specific override. A `None` argument inherits the
    /// main default; leaving both unspecified is an error, since the
    /// override would then say nothing.
    pub fn set_component_override(
        &mut self,
        component: usize,
        decomp_type: Option<DecompType>,
        levels: Option<u8>,
    ) -> Result<(), J2kError> {
        self.check_component(component)?;
        if decomp_type.is_none() && levels.is_none() {
            return Err(J2kError::InvalidArgument(
                "component override specifies neither decomposition type nor levels".to_string(),
            ));
        }
        if let Some(levels) = levels {
            validate_levels(levels)?;
        }
        self.components[component] = ComponentDecomp::ComponentDefault {
            decomp_type: decomp_type.unwrap_or(self.main_decomp_type),
            levels: levels.unwrap_or(self.main_levels),
        };
        Ok(())
    }

    /// Which tier supplies `component`'s parameters.
    pub fn tier(&self, component: usize) -> Result<SpecTier, J2kError> {
        self.check_component(component)?;
        Ok(match self.components[component] {
            ComponentDecomp::MainDefault => SpecTier::MainDefault,
            ComponentDecomp::ComponentDefault { .. } => SpecTier::ComponentDefault,
        })
    }

    /// Effective decomposition type for `component`.
    pub fn decomp_type(&self, component: usize) -> Result<DecompType, J2kError> {
        self.check_component(component)?;
        Ok(match self.components[component] {
            ComponentDecomp::MainDefault => self.main_decomp_type,
            ComponentDecomp::ComponentDefault { decomp_type, .. } => decomp_type,
        })
    }

    /// Effective decomposition level count for `component`.
    pub fn levels(&self, component: usize) -> Result<u8, J2kError> {
        self.check_component(component)?;
        Ok(match self.components[component] {
            ComponentDecomp::MainDefault => self.main_levels,
            ComponentDecomp::ComponentDefault { levels, .. } => levels,
        })
    }

    /// Tile-default tier. The codec assumes one decomposition per whole
    /// image, so this tier is intentionally unsupported.
    pub fn set_tile_default(
        &mut self,
        _tile: usize,
        _decomp_type: Option<DecompType>,
        _levels: Option<u8>,
    ) -> Result<(), J2kError> {
        Err(J2kError::NotImplemented(
            "tile specific decomposition defaults",
        ))
    }

    /// Tile-component tier; intentionally unsupported, as `set_tile_default`.
    pub fn set_tile_component_override(
        &mut self,
        _tile: usize,
        _component: usize,
        _decomp_type: Option<DecompType>,
        _levels: Option<u8>,
    ) -> Result<(), J2kError> {
        Err(J2kError::NotImplemented(
            "tile component decomposition overrides",
        ))
    }

    fn check_component(&self, component: usize) -> Result<(), J2kError> {
        if component >= self.components.len() {
            return Err(J2kError::InvalidArgument(format!(
                "component {component} out of range (have {})",
                self.components.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum ComponentFilter {
    MainDefault,
    ComponentDefault { filter: FilterId },
}

/// Per-component resolution of the wavelet filter, following the same tier
/// structure as `DecompSpec`.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    main_filter: FilterId,
    components: Vec<ComponentFilter>,
}

impl FilterSpec {
    pub fn new(component_count: usize, main_filter: FilterId) -> Result<Self, J2kError> {
        validate_component_count(component_count)?;
        Ok(Self {
            main_filter,
            components: vec![ComponentFilter::MainDefault; component_count],
        })
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn main_filter(&self) -> FilterId {
        self.main_filter
    }

    pub fn set_component_override(
        &mut self,
        component: usize,
        filter: FilterId,
    ) -> Result<(), J2kError> {
        self.check_component(component)?;
        self.components[component] = ComponentFilter::ComponentDefault { filter };
        Ok(())
    }

    /// Which tier supplies `component`'s filter.
    pub fn tier(&self, component: usize) -> Result<SpecTier, J2kError> {
        self.check_component(component)?;
        Ok(match self.components[component] {
            ComponentFilter::MainDefault => SpecTier::MainDefault,
            ComponentFilter::ComponentDefault { .. } => SpecTier::ComponentDefault,
        })
    }

    /// Effective filter for `component`.
    pub fn filter(&self, component: usize) -> Result<FilterId, J2kError> {
        self.check_component(component)?;
        Ok(match self.components[component] {
            ComponentFilter::MainDefault => self.main_filter,
            ComponentFilter::ComponentDefault { filter } => filter,
        })
    }

    /// Numeric sample type the effective filter operates on.
    pub fn data_type(&self, component: usize) -> Result<SampleType, J2kError> {
        match self.filter(component)?.descriptor() {
            Some(f) => Ok(f.data_type()),
            None => Err(J2kError::NotImplemented("custom filter sample types")),
        }
    }

    /// Tile-default tier; intentionally unsupported.
    pub fn set_tile_default(&mut self, _tile: usize, _filter: FilterId) -> Result<(), J2kError> {
        Err(J2kError::NotImplemented("tile specific filter defaults"))
    }

    /// Tile-component tier; intentionally unsupported.
    pub fn set_tile_component_override(
        &mut self,
        _tile: usize,
        _component: usize,
        _filter: FilterId,
    ) -> Result<(), J2kError> {
        Err(J2kError::NotImplemented("tile component filter overrides"))
    }

    fn check_component(&self, component: usize) -> Result<(), J2kError> {
        if component >= self.components.len() {
            return Err(J2kError::InvalidArgument(format!(
                "component {component} out of range (have {})",
                self.components.len()
            )));
        }
        Ok(())
    }
}

fn validate_component_count(count: usize) -> Result<(), J2kError> {
    if count == 0 || count > MAXIMUM_COMPONENT_COUNT {
        return Err(J2kError::InvalidArgument(format!(
            "component count {count} outside 1..={MAXIMUM_COMPONENT_COUNT}"
        )));
    }
    Ok(())
}

fn validate_levels(levels: u8) -> Result<(), J2kError> {
    if levels > MAXIMUM_DECOMPOSITION_LEVELS {
        return Err(J2kError::InvalidArgument(format!(
            "{levels} decomposition levels exceed the limit of {MAXIMUM_DECOMPOSITION_LEVELS}"
        )));
    }
    Ok(())
}
