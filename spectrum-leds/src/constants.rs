/// Default number of samples per audio frame (must be a power of two).
pub const DEFAULT_SAMPLE_COUNT: usize = 64;

/// Default number of addressable LEDs on the strip.
pub const DEFAULT_PIXEL_COUNT: usize = 300;

/// Default microphone sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Number of slots in each frame exchange (one writing, one published, one spare).
pub const DEFAULT_SLOT_COUNT: usize = 3;

/// Largest slot count a single exchange can index.
pub const MAX_SLOT_COUNT: usize = 254;

/// Full-scale magnitude of a 24-bit microphone sample.
pub const MIC_FULL_SCALE: i32 = (1 << 23) - 1;

/// Lowest frequency worth displaying, in Hz.
pub const MIN_USABLE_FREQ: u32 = 60;

/// Highest frequency worth displaying, in Hz.
pub const MAX_USABLE_FREQ: u32 = 6_000;

/// Default hue range swept as magnitude goes from 0 to 1, in degrees.
pub const DEFAULT_HUE_SPAN: f32 = 300.0;
