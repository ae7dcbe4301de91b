//! Wavelet filter capability descriptors.
//!
//! A filter value describes, independent of any subband, the tap support of
//! its low- and high-pass branches on both the analysis and synthesis sides,
//! its implementation kind, and whether it is reversible. It carries no
//! mutable state; the transform stages consume these numbers to size their
//! line buffers and to decide whether block-based overlap processing is
//! equivalent to an unblocked transform.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Numeric identity of a wavelet filter, as signalled in the COD/COC
/// transformation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i8)]
pub enum FilterId {
    /// 9/7 irreversible filter.
    Irreversible9x7 = 0,
    /// 5/3 reversible filter.
    Reversible5x3 = 1,
    /// User supplied filter, signalled out of band.
    Custom = -1,
}

impl FilterId {
    /// Capability descriptor for the built-in filters. `Custom` has none.
    pub fn descriptor(self) -> Option<&'static dyn WaveletFilter> {
        match self {
            FilterId::Irreversible9x7 => Some(&Filter97),
            FilterId::Reversible5x3 => Some(&Filter53),
            FilterId::Custom => None,
        }
    }
}

/// How a filter is realized by the transform stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterImplementation {
    /// Lifting steps over integer samples.
    IntegerLifting = 0,
    /// Lifting steps over floating-point samples.
    FloatLifting = 1,
    /// Direct convolution over floating-point samples.
    FloatConvolution = 2,
}

/// Numeric type of the samples a filter operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    Int = 0,
    Float = 1,
}

/// Capability descriptor of one wavelet filter.
///
/// Support getters report how many taps extend before (`negative`) and after
/// (`positive`) the center sample of the low- and high-pass branches, for
/// the analysis and synthesis directions.
pub trait WaveletFilter {
    fn id(&self) -> FilterId;

    fn analysis_low_negative_support(&self) -> u32;
    fn analysis_low_positive_support(&self) -> u32;
    fn analysis_high_negative_support(&self) -> u32;
    fn analysis_high_positive_support(&self) -> u32;
    fn synthesis_low_negative_support(&self) -> u32;
    fn synthesis_low_positive_support(&self) -> u32;
    fn synthesis_high_negative_support(&self) -> u32;
    fn synthesis_high_positive_support(&self) -> u32;

    fn implementation(&self) -> FilterImplementation;

    fn data_type(&self) -> SampleType;

    /// Whether the filter is suitable for lossless coding.
    fn is_reversible(&self) -> bool;

    /// Whether transforming a block with `tail_overlap` samples of overlap
    /// before it and `head_overlap` after it yields the same output as a
    /// full, unblocked transform of an `input_len`-sample signal.
    fn is_same_as_full_wavelet(
        &self,
        tail_overlap: u32,
        head_overlap: u32,
        input_len: u32,
    ) -> bool;
}

/// The 5/3 reversible filter (integer lifting).
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter53;

impl WaveletFilter for Filter53 {
    fn id(&self) -> FilterId {
        FilterId::Reversible5x3
    }

    fn analysis_low_negative_support(&self) -> u32 {
        2
    }

    fn analysis_low_positive_support(&self) -> u32 {
        2
    }

    fn analysis_high_negative_support(&self) -> u32 {
        1
    }

    fn analysis_high_positive_support(&self) -> u32 {
        1
    }

    fn synthesis_low_negative_support(&self) -> u32 {
        1
    }

    fn synthesis_low_positive_support(&self) -> u32 {
        1
    }

    fn synthesis_high_negative_support(&self) -> u32 {
        2
    }

    fn synthesis_high_positive_support(&self) -> u32 {
        2
    }

    fn implementation(&self) -> FilterImplementation {
        FilterImplementation::IntegerLifting
    }

    fn data_type(&self) -> SampleType {
        SampleType::Int
    }

    fn is_reversible(&self) -> bool {
        true
    }

    fn is_same_as_full_wavelet(
        &self,
        tail_overlap: u32,
        head_overlap: u32,
        input_len: u32,
    ) -> bool {
        if input_len % 2 == 0 {
            tail_overlap >= 2 && head_overlap >= 1
        } else {
            tail_overlap >= 2 && head_overlap >= 2
        }
    }
}

/// The 9/7 irreversible filter (floating-point lifting).
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter97;

impl Filter97 {
    // 9/7 lifting constants
    pub const ALPHA: f32 = -1.5861343;
    pub const BETA: f32 = -0.05298012;
    pub const GAMMA: f32 = 0.8829111;
    pub const DELTA: f32 = 0.44350687;
    pub const K: f32 = 1.2301741;
    pub const INV_K: f32 = 1.0 / 1.2301741;
}

impl WaveletFilter for Filter97 {
    fn id(&self) -> FilterId {
        FilterId::Irreversible9x7
    }

    fn analysis_low_negative_support(&self) -> u32 {
        4
    }

    fn analysis_low_positive_support(&self) -> u32 {
        4
    }

    fn analysis_high_negative_support(&self) -> u32 {
        3
    }

    fn analysis_high_positive_support(&self) -> u32 {
        3
    }

    fn synthesis_low_negative_support(&self) -> u32 {
        3
    }

    fn synthesis_low_positive_support(&self) -> u32 {
        3
    }

    fn synthesis_high_negative_support(&self) -> u32 {
        4
    }

    fn synthesis_high_positive_support(&self) -> u32 {
        4
    }

    fn implementation(&self) -> FilterImplementation {
        FilterImplementation::FloatLifting
    }

    fn data_type(&self) -> SampleType {
        SampleType::Float
    }

    fn is_reversible(&self) -> bool {
        false
    }

    fn is_same_as_full_wavelet(
        &self,
        tail_overlap: u32,
        head_overlap: u32,
        input_len: u32,
    ) -> bool {
        if input_len % 2 == 0 {
            tail_overlap >= 4 && head_overlap >= 3
        } else {
            tail_overlap >= 4 && head_overlap >= 4
        }
    }
}
