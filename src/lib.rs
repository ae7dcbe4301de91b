pub mod constants;
pub mod error;

pub use error::J2kError;

pub use stream::{
    BeBufferedFile, BinaryDataInput, BinaryDataOutput, BufferedFile, ByteOrdering, LeBufferedFile,
    OpenMode,
};
pub use wavelet::{
    DecompSpec, DecompType, Filter53, Filter97, FilterId, FilterImplementation, FilterSpec,
    SampleType, SpecTier, Subband, SubbandOrientation, SubbandTree, WaveletFilter,
};

pub mod stream;
pub mod wavelet;
