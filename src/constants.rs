//! Centralized constants for the mesh engine.
//! Contains only the constants actually used throughout the codebase.

/// √3, the Courant-bound scale factor between sample rate and junction spacing.
pub const SQRT_3: f32 = 1.732_050_8;

/// Maximum output channel count across every layout in the catalogue.
pub const MAX_LAYOUT_CHANNELS: usize = 48;

// Reference compile-time defaults, used by `DefaultMeshConfig`.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub const DEFAULT_BUFFER_SIZE: usize = 128;
pub const DEFAULT_SIZE_X_J: usize = 32;
pub const DEFAULT_SIZE_Y_J: usize = 32;
pub const DEFAULT_SIZE_Z_J: usize = 32;
pub const DEFAULT_PROPAGATION_SPEED: f32 = 343.0;
pub const DEFAULT_MAX_INPUT_COUNT: usize = 16;
pub const DEFAULT_MAX_OUTPUT_COUNT: usize = MAX_LAYOUT_CHANNELS;
