//! Rectilinear digital waveguide mesh acoustic simulation engine with
//! frequency-dependent boundary filters.
//!
//! [`engine::DwmEngine`] owns the pressure volumes and boundary state and
//! drives the per-block simulation loop; [`layouts`] supplies the
//! microphone-array catalogue sources and microphones are read through.

pub mod boundary;
pub mod config;
pub mod constants;
pub mod engine;
pub mod interpolation;
pub mod layouts;
pub mod math;

pub use config::{DefaultMeshConfig, MeshConfig};
pub use engine::{DwmEngine, InputSource};
pub use layouts::{layout_for, resolve_tag, Layout, LayoutTag};

// Real-time safe logging: compiles away entirely under the default
// `rt-safe` feature since `process` must never allocate, lock, or touch
// I/O on the audio thread.
#[cfg(feature = "rt-safe")]
#[macro_export]
macro_rules! rt_eprintln {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "rt-safe"))]
#[macro_export]
macro_rules! rt_eprintln {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}
