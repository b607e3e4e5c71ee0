//! Application Configuration Constants
//!
//! Centralized configuration for timings, bounds, and defaults.

/// Interval Timer Configuration
pub mod timer {
    /// Shortest period the timer will honor (milliseconds)
    pub const MIN_PERIOD_MS: u64 = 10;

    /// Periods below this threshold sleep in period/10 slices (milliseconds)
    pub const SHORT_PERIOD_THRESHOLD_MS: u64 = 50;

    /// Divisor for the slice length of short periods
    pub const SHORT_PERIOD_SLICE_DIVISOR: u32 = 10;

    /// Fixed slice length for longer periods (milliseconds)
    pub const LONG_PERIOD_SLICE_MS: u64 = 5;
}

/// Frame Channel Configuration
pub mod channel {
    /// Maximum frames buffered between capture and encode
    pub const FRAME_CAPACITY: usize = 100;

    /// Consumer wait when the channel is empty (milliseconds)
    pub const EMPTY_WAIT_MS: u64 = 10;
}

/// Capture and Session Configuration
pub mod capture {
    /// Capture-region dimensions must be multiples of this (block-based encoders)
    pub const REGION_ALIGNMENT: u32 = 16;

    /// Frame rate bounds (frames per second)
    pub const MIN_FPS: u32 = 1;
    pub const MAX_FPS: u32 = 40;

    /// Default frame rate
    pub const DEFAULT_FPS: u32 = 10;

    /// Default cap on frames per session
    pub const DEFAULT_FRAME_LIMIT: u32 = 1000;

    /// Default loop count for looping formats (0 = infinite)
    pub const DEFAULT_LOOP_COUNT: u16 = 0;

    /// Timestamp pattern for synthesized output file names
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
}
