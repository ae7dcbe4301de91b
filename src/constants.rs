// Default size of the byte buffer backing a buffered random-access stream.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

// ISO/IEC 15444-1, A.6.1: the SPcod decomposition level count is 0..32.
pub const MAXIMUM_DECOMPOSITION_LEVELS: u8 = 32;

// Nominal code-block dimensions used when the coding style does not say
// otherwise. ISO/IEC 15444-1, table A.18 caps the code-block area at 4096
// samples; 64x64 is the customary default.
pub const DEFAULT_CODE_BLOCK_WIDTH: u32 = 64;
pub const DEFAULT_CODE_BLOCK_HEIGHT: u32 = 64;

pub const MINIMUM_COMPONENT_COUNT: usize = 1;
// ISO/IEC 15444-1, A.5.1: Csiz is 1..16384.
pub const MAXIMUM_COMPONENT_COUNT: usize = 16384;
