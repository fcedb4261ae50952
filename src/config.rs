//! Compile-time mesh configuration.
//!
//! Mirrors the way a fixed-size delay line is made generic over its length:
//! the mesh is generic over a `MeshConfig` implementor whose associated
//! constants fix the junction grid size, sample rate, and buffer shape at
//! compile time. `DefaultMeshConfig` supplies the reference values; a
//! downstream crate that needs a different grid defines its own
//! zero-sized type implementing this trait.

use crate::constants::*;

/// Compile-time parameters of a mesh instance.
pub trait MeshConfig: Copy {
    /// DSP sample rate, in Hz.
    const SAMPLE_RATE: u32;
    /// Samples processed per call to `process`.
    const BUFFER_SIZE: usize;
    /// Junction counts per axis.
    const SIZE_X_J: usize;
    const SIZE_Y_J: usize;
    const SIZE_Z_J: usize;
    /// Sound propagation speed, in metres/second.
    const PROPAGATION_SPEED: f32;
    /// Maximum simultaneous input sources accepted by `process`.
    const MAX_INPUT_COUNT: usize;
    /// Maximum channel count across the layout catalogue.
    const MAX_OUTPUT_COUNT: usize;

    /// Metric distance between adjacent junctions, fixed by the Courant
    /// stability bound of the rectilinear scheme.
    fn junction_spacing_m() -> f32 {
        SQRT_3 * Self::PROPAGATION_SPEED / Self::SAMPLE_RATE as f32
    }

    fn size_x_m() -> f32 {
        Self::SIZE_X_J as f32 * Self::junction_spacing_m()
    }

    fn size_y_m() -> f32 {
        Self::SIZE_Y_J as f32 * Self::junction_spacing_m()
    }

    fn size_z_m() -> f32 {
        Self::SIZE_Z_J as f32 * Self::junction_spacing_m()
    }

    /// Total junction count of the pressure volume.
    fn volume_len() -> usize {
        Self::SIZE_X_J * Self::SIZE_Y_J * Self::SIZE_Z_J
    }
}

/// Checked at monomorphization time: fails the build the same way the
/// reference implementation's `static_assert`s do, just expressed as an
/// inline const block instead of a preprocessor macro.
pub(crate) const fn assert_valid_config<C: MeshConfig>() {
    assert!(C::SAMPLE_RATE >= 1, "sample rate must be >= 1");
    assert!(C::BUFFER_SIZE >= 1, "buffer size must be >= 1");
    assert!(C::SIZE_X_J >= 3, "size_x_j must be >= 3");
    assert!(C::SIZE_Y_J >= 3, "size_y_j must be >= 3");
    assert!(C::SIZE_Z_J >= 3, "size_z_j must be >= 3");
    assert!(C::PROPAGATION_SPEED > 0.0, "propagation speed must be > 0");
    assert!(C::MAX_INPUT_COUNT >= 1, "max input count must be >= 1");
    assert!(
        C::MAX_OUTPUT_COUNT >= MAX_LAYOUT_CHANNELS,
        "max output count must cover the largest catalogue layout"
    );
}

/// Reference compile-time parameters from the engine's original
/// specification: 16 kHz sample rate, 128-sample blocks, a 32³ junction
/// cuboid, and sound travelling at 343 m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultMeshConfig;

impl MeshConfig for DefaultMeshConfig {
    const SAMPLE_RATE: u32 = DEFAULT_SAMPLE_RATE;
    const BUFFER_SIZE: usize = DEFAULT_BUFFER_SIZE;
    const SIZE_X_J: usize = DEFAULT_SIZE_X_J;
    const SIZE_Y_J: usize = DEFAULT_SIZE_Y_J;
    const SIZE_Z_J: usize = DEFAULT_SIZE_Z_J;
    const PROPAGATION_SPEED: f32 = DEFAULT_PROPAGATION_SPEED;
    const MAX_INPUT_COUNT: usize = DEFAULT_MAX_INPUT_COUNT;
    const MAX_OUTPUT_COUNT: usize = DEFAULT_MAX_OUTPUT_COUNT;
}
