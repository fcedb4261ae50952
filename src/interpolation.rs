//! Trilinear splat (write) and sample (read) of the pressure volume at
//! arbitrary metric positions, plus the per-block precomputation that turns
//! a metric position into junction-grid interpolation parameters.

use crate::config::MeshConfig;
use crate::math::{clamp, idx, lerp};

/// Precomputed trilinear interpolation parameters for one metric position:
/// the 8 corner flat indices and the 3 fractional weights. Computed once per
/// block and reused for every sample, since source/microphone positions are
/// fixed within a block.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpParams {
    /// Flat indices of the 8 corners, ordered `[x][y][z]` with 0/1 selecting
    /// the lower/upper junction along that axis.
    pub indices: [[[usize; 2]; 2]; 2],
    pub fx: f32,
    pub fy: f32,
    pub fz: f32,
}

/// Convert a metric position (plus optional metric offset) to interpolation
/// parameters, clamping to valid mesh coordinates.
pub fn compute_params<C: MeshConfig>(pos_m: [f32; 3], offset_m: Option<[f32; 3]>) -> InterpParams {
    let spacing = C::junction_spacing_m();
    let offset = offset_m.unwrap_or([0.0, 0.0, 0.0]);

    let cx = clamp(
        (pos_m[0] + offset[0]) / spacing - 0.5,
        0.0,
        (C::SIZE_X_J - 1) as f32,
    );
    let cy = clamp(
        (pos_m[1] + offset[1]) / spacing - 0.5,
        0.0,
        (C::SIZE_Y_J - 1) as f32,
    );
    let cz = clamp(
        (pos_m[2] + offset[2]) / spacing - 0.5,
        0.0,
        (C::SIZE_Z_J - 1) as f32,
    );

    let x0 = cx.floor() as usize;
    let x1 = cx.ceil() as usize;
    let y0 = cy.floor() as usize;
    let y1 = cy.ceil() as usize;
    let z0 = cz.floor() as usize;
    let z1 = cz.ceil() as usize;

    let mut indices = [[[0usize; 2]; 2]; 2];
    for (xi, x) in [x0, x1].into_iter().enumerate() {
        for (yi, y) in [y0, y1].into_iter().enumerate() {
            for (zi, z) in [z0, z1].into_iter().enumerate() {
                indices[xi][yi][zi] = idx(x, y, z, C::SIZE_X_J, C::SIZE_Y_J);
            }
        }
    }

    InterpParams {
        indices,
        fx: cx.fract(),
        fy: cy.fract(),
        fz: cz.fract(),
    }
}

impl InterpParams {
    /// The 8 `(flat index, trilinear weight)` corner pairs this position
    /// splats onto or samples from. Shared by `write_value` and by the
    /// engine's multi-source accumulation so both agree on corner order and
    /// weight computation.
    #[inline]
    pub fn corners(&self) -> [(usize, f32); 8] {
        let mut out = [(0usize, 0.0f32); 8];
        let mut n = 0;
        for (xi, wx) in [1.0 - self.fx, self.fx].into_iter().enumerate() {
            for (yi, wy) in [1.0 - self.fy, self.fy].into_iter().enumerate() {
                for (zi, wz) in [1.0 - self.fz, self.fz].into_iter().enumerate() {
                    out[n] = (self.indices[xi][yi][zi], wx * wy * wz);
                    n += 1;
                }
            }
        }
        out
    }
}

/// Splat `value` into `volume` at the 8 corners described by `params`,
/// blending with the existing value at each corner rather than adding —
/// this bounds the effect of a source on each junction and conserves total
/// amplitude since the 8 trilinear weights always sum to 1.
///
/// This applies one source in isolation. Two sources splatting onto
/// overlapping corners in the same sample must not each call this in
/// sequence — doing so makes the result depend on call order, and opposite-
/// sign sources at the same position would not cancel. The engine instead
/// accumulates same-sample contributions per corner via `corners()` and
/// applies a single blended lerp; see `DwmEngine::process`.
#[inline]
pub fn write_value(volume: &mut [f32], value: f32, params: &InterpParams) {
    for (i, w) in params.corners() {
        volume[i] = lerp(volume[i], value, w);
    }
}

/// Read a trilinearly-interpolated value from `volume` at the position
/// described by `params`.
#[inline]
pub fn read_value(volume: &[f32], params: &InterpParams) -> f32 {
    let i = &params.indices;
    let along_x = |yi: usize, zi: usize| lerp(volume[i[0][yi][zi]], volume[i[1][yi][zi]], params.fx);
    let along_y = |zi: usize| lerp(along_x(0, zi), along_x(1, zi), params.fy);
    lerp(along_y(0), along_y(1), params.fz)
}
