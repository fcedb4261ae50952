//! The digital waveguide mesh itself: two pressure volumes, six boundary
//! planes, and the block-processing loop that ties sources, the mesh
//! iteration, and microphone sampling together.

use std::marker::PhantomData;

use crate::boundary::{normalised_to_r1r2, BoundaryState};
use crate::config::{assert_valid_config, MeshConfig};
use crate::interpolation::{compute_params, read_value, InterpParams};
use crate::layouts::{layout_for, LayoutTag};
use crate::math::{clamp, idx, lerp};

const Z_NEG: usize = 0;
const Y_NEG: usize = 1;
const X_NEG: usize = 2;
const X_POS: usize = 3;
const Y_POS: usize = 4;
const Z_POS: usize = 5;

/// One block's worth of a point source: its metric position (fixed for the
/// whole block, per the single-position-per-block convention) and its
/// `BUFFER_SIZE` samples.
#[derive(Debug, Clone, Copy)]
pub struct InputSource<'a> {
    pub pos_m: [f32; 3],
    pub samples: &'a [f32],
}

/// A rectilinear digital waveguide mesh with frequency-dependent boundary
/// filters, generic over its compile-time shape and sample rate.
pub struct DwmEngine<C: MeshConfig> {
    p: Vec<f32>,
    p_prime: Vec<f32>,
    /// Per-face boundary-state planes, in `[z-, y-, x-, x+, y+, z+]` order.
    planes: [Vec<BoundaryState>; 6],
    /// Per-face `(R1, R2)` pairs, same order as `planes`.
    coeffs: [[f32; 2]; 6],
    /// Scratch accumulators for the per-sample source splat: indexed by the
    /// same flat index as `p`, holding the running sum of trilinear weights
    /// and weight-times-value for every corner touched this sample.
    /// Allocated once in `create` and always left zeroed between samples so
    /// `process` never allocates.
    splat_weight: Vec<f32>,
    splat_value: Vec<f32>,
    /// Corners touched by the current sample's sources, in the order they
    /// were touched (may contain duplicates when sources overlap).
    touched: Vec<usize>,
    _config: PhantomData<C>,
}

impl<C: MeshConfig> DwmEngine<C> {
    /// Allocate a fresh instance. Contents are not meaningful until `init`
    /// is called.
    pub fn create() -> Self {
        const { assert_valid_config::<C>() };

        let volume_len = C::volume_len();
        let planes = [
            vec![BoundaryState::new(); C::SIZE_X_J * C::SIZE_Y_J], // z-
            vec![BoundaryState::new(); C::SIZE_X_J * C::SIZE_Z_J], // y-
            vec![BoundaryState::new(); C::SIZE_Y_J * C::SIZE_Z_J], // x-
            vec![BoundaryState::new(); C::SIZE_Y_J * C::SIZE_Z_J], // x+
            vec![BoundaryState::new(); C::SIZE_X_J * C::SIZE_Z_J], // y+
            vec![BoundaryState::new(); C::SIZE_X_J * C::SIZE_Y_J], // z+
        ];

        Self {
            p: vec![0.0; volume_len],
            p_prime: vec![0.0; volume_len],
            planes,
            coeffs: [[0.0, 0.0]; 6],
            splat_weight: vec![0.0; volume_len],
            splat_value: vec![0.0; volume_len],
            touched: Vec::with_capacity(C::MAX_INPUT_COUNT * 8),
            _config: PhantomData,
        }
    }

    /// Zero all mesh state and install the six boundary coefficient pairs,
    /// in `[z-, y-, x-, x+, y+, z+]` order.
    pub fn init(&mut self, boundary_params: &[[f32; 2]; 6], normalised: bool) {
        self.p.iter_mut().for_each(|v| *v = 0.0);
        self.p_prime.iter_mut().for_each(|v| *v = 0.0);
        for plane in &mut self.planes {
            plane.iter_mut().for_each(BoundaryState::clear);
        }
        self.splat_weight.iter_mut().for_each(|v| *v = 0.0);
        self.splat_value.iter_mut().for_each(|v| *v = 0.0);
        self.touched.clear();

        for (slot, params) in self.coeffs.iter_mut().zip(boundary_params.iter()) {
            *slot = if normalised {
                normalised_to_r1r2(params[0], params[1])
            } else {
                *params
            };
        }
    }

    /// Consume and drop the instance. Storage is actually released by
    /// `Drop`; this exists only so callers used to an explicit destroy call
    /// have one to make.
    pub fn destroy(self) {}

    /// Run one processing block: splat sources, iterate the mesh, sample
    /// microphones, for each of `C::BUFFER_SIZE` samples.
    pub fn process(
        &mut self,
        inputs: &[InputSource],
        layout_tag: LayoutTag,
        mic_scale: f32,
        centre_m: [f32; 3],
        outputs: &mut [&mut [f32]],
    ) {
        let n = inputs.len().min(C::MAX_INPUT_COUNT);
        let spacing = C::junction_spacing_m();

        let source_params: Vec<InterpParams> = inputs[..n]
            .iter()
            .map(|src| compute_params::<C>(src.pos_m, None))
            .collect();

        let layout = layout_for(layout_tag);
        let radius_m = layout.radius_j * spacing * mic_scale;

        let clamped_centre = [
            clamp_centre_axis(centre_m[0], radius_m, C::size_x_m()),
            clamp_centre_axis(centre_m[1], radius_m, C::size_y_m()),
            clamp_centre_axis(centre_m[2], radius_m, C::size_z_m()),
        ];

        let channel_params: Vec<InterpParams> = layout
            .offsets
            .iter()
            .map(|[ox, oy, oz]| {
                let offset_m = [
                    *ox as f32 * spacing * mic_scale,
                    *oy as f32 * spacing * mic_scale,
                    *oz as f32 * spacing * mic_scale,
                ];
                compute_params::<C>(clamped_centre, Some(offset_m))
            })
            .collect();

        for sample_idx in 0..C::BUFFER_SIZE {
            self.splat_sources(&source_params, inputs, sample_idx);

            self.iterate();

            for (ch, params) in channel_params.iter().enumerate() {
                if let Some(out) = outputs.get_mut(ch) {
                    out[sample_idx] = read_value(&self.p_prime, params);
                }
            }

            std::mem::swap(&mut self.p, &mut self.p_prime);
        }
    }

    /// Splat every active source's current sample into `p`.
    ///
    /// Sources are accumulated per corner (summed weight and weighted
    /// value) before a single blended lerp is applied, rather than calling
    /// `write_value` once per source in sequence. Sequential per-source
    /// lerps are order-dependent: two sources of opposite sign at the same
    /// position would not cancel, since `lerp(lerp(p, a, w), b, w) != p`
    /// in general even when `a == -b`. Accumulating first makes the net
    /// value feeding the lerp exactly zero in that case, so it leaves the
    /// junction untouched.
    fn splat_sources(&mut self, source_params: &[InterpParams], inputs: &[InputSource], sample_idx: usize) {
        self.touched.clear();
        for (k, params) in source_params.iter().enumerate() {
            let value = inputs[k].samples[sample_idx];
            for (i, w) in params.corners() {
                self.splat_weight[i] += w;
                self.splat_value[i] += w * value;
                self.touched.push(i);
            }
        }

        for &i in &self.touched {
            let weight = self.splat_weight[i];
            let corner_value = if weight != 0.0 {
                self.splat_value[i] / weight
            } else {
                0.0
            };
            self.p[i] = lerp(self.p[i], corner_value, weight.min(1.0));
            self.splat_weight[i] = 0.0;
            self.splat_value[i] = 0.0;
        }
    }

    /// Advance every junction by one mesh step, reading only from `p` and
    /// writing only to `p_prime`, per the DWM update stencil.
    fn iterate(&mut self) {
        let (sx, sy, sz) = (C::SIZE_X_J, C::SIZE_Y_J, C::SIZE_Z_J);

        for z in 0..sz {
            for y in 0..sy {
                for x in 0..sx {
                    let j = idx(x, y, z, sx, sy);
                    let here = self.p[j];

                    let n_xn = if x == 0 {
                        let plane_idx = z * sy + y;
                        self.planes[X_NEG][plane_idx].process(here, self.coeffs[X_NEG])
                    } else {
                        self.p[idx(x - 1, y, z, sx, sy)]
                    };
                    let n_xp = if x == sx - 1 {
                        let plane_idx = z * sy + y;
                        self.planes[X_POS][plane_idx].process(here, self.coeffs[X_POS])
                    } else {
                        self.p[idx(x + 1, y, z, sx, sy)]
                    };
                    let n_yn = if y == 0 {
                        let plane_idx = z * sx + x;
                        self.planes[Y_NEG][plane_idx].process(here, self.coeffs[Y_NEG])
                    } else {
                        self.p[idx(x, y - 1, z, sx, sy)]
                    };
                    let n_yp = if y == sy - 1 {
                        let plane_idx = z * sx + x;
                        self.planes[Y_POS][plane_idx].process(here, self.coeffs[Y_POS])
                    } else {
                        self.p[idx(x, y + 1, z, sx, sy)]
                    };
                    let n_zn = if z == 0 {
                        let plane_idx = y * sx + x;
                        self.planes[Z_NEG][plane_idx].process(here, self.coeffs[Z_NEG])
                    } else {
                        self.p[idx(x, y, z - 1, sx, sy)]
                    };
                    let n_zp = if z == sz - 1 {
                        let plane_idx = y * sx + x;
                        self.planes[Z_POS][plane_idx].process(here, self.coeffs[Z_POS])
                    } else {
                        self.p[idx(x, y, z + 1, sx, sy)]
                    };

                    self.p_prime[j] =
                        (n_xn + n_xp + n_yn + n_yp + n_zn + n_zp) / 3.0 - self.p_prime[j];
                }
            }
        }
    }
}

/// Clamp a single axis of the microphone-array centre so a sphere of
/// `radius_m` around it stays within `[0, extent_m]`. When the radius
/// exceeds half the extent the sphere cannot fully fit; the centre is then
/// pinned to the midpoint rather than left in an inverted range.
fn clamp_centre_axis(value: f32, radius_m: f32, extent_m: f32) -> f32 {
    let half = extent_m * 0.5;
    let lo = radius_m.min(half);
    let hi = (extent_m - radius_m).max(half);
    clamp(value, lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultMeshConfig as C;

    fn silent_engine() -> DwmEngine<C> {
        let mut engine = DwmEngine::<C>::create();
        engine.init(&[[0.0, 0.0]; 6], false);
        engine
    }

    fn centre_m() -> [f32; 3] {
        [C::size_x_m() / 2.0, C::size_y_m() / 2.0, C::size_z_m() / 2.0]
    }

    #[test]
    fn silence_in_silence_out() {
        let mut engine = silent_engine();
        let zeros = vec![0.0f32; C::BUFFER_SIZE];
        let inputs = [InputSource {
            pos_m: centre_m(),
            samples: &zeros,
        }];
        let mut out_buf = vec![0.0f32; C::BUFFER_SIZE];
        {
            let mut outputs: Vec<&mut [f32]> = vec![&mut out_buf];
            engine.process(&inputs, LayoutTag::Mono, 1.0, centre_m(), &mut outputs);
        }
        assert!(out_buf.iter().all(|v| *v == 0.0));
        assert!(engine.p.iter().all(|v| v.is_finite()));
        assert!(engine.p_prime.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn stereo_is_mirror_symmetric_for_a_centred_impulse() {
        let mut engine = silent_engine();
        let mut impulse = vec![0.0f32; C::BUFFER_SIZE];
        impulse[0] = 1.0;
        let inputs = [InputSource {
            pos_m: centre_m(),
            samples: &impulse,
        }];

        let mut left = vec![0.0f32; C::BUFFER_SIZE];
        let mut right = vec![0.0f32; C::BUFFER_SIZE];
        {
            let mut outputs: Vec<&mut [f32]> = vec![&mut left, &mut right];
            engine.process(&inputs, LayoutTag::Stereo, 1.0, centre_m(), &mut outputs);
        }

        for k in 0..C::BUFFER_SIZE {
            assert!((left[k] - right[k]).abs() < 1e-4, "sample {k}: {} vs {}", left[k], right[k]);
        }
    }

    #[test]
    fn opposing_sources_at_the_same_position_cancel_exactly() {
        let mut engine = silent_engine();
        let pos = centre_m();
        let mut pos_samples = vec![0.0f32; C::BUFFER_SIZE];
        let mut neg_samples = vec![0.0f32; C::BUFFER_SIZE];
        for k in 0..C::BUFFER_SIZE {
            pos_samples[k] = 0.3;
            neg_samples[k] = -0.3;
        }
        let inputs = [
            InputSource {
                pos_m: pos,
                samples: &pos_samples,
            },
            InputSource {
                pos_m: pos,
                samples: &neg_samples,
            },
        ];
        let mut out_buf = vec![0.0f32; C::BUFFER_SIZE];
        {
            let mut outputs: Vec<&mut [f32]> = vec![&mut out_buf];
            engine.process(&inputs, LayoutTag::Mono, 1.0, pos, &mut outputs);
        }
        assert!(out_buf.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn extra_input_sources_beyond_max_are_ignored() {
        let mut engine_a = silent_engine();
        let mut engine_b = silent_engine();

        let mut impulse = vec![0.0f32; C::BUFFER_SIZE];
        impulse[0] = 1.0;
        let zeros = vec![0.0f32; C::BUFFER_SIZE];

        let exact: Vec<InputSource> = (0..C::MAX_INPUT_COUNT)
            .map(|i| InputSource {
                pos_m: centre_m(),
                samples: if i == 0 { &impulse } else { &zeros },
            })
            .collect();
        let mut over = exact.clone();
        for _ in 0..5 {
            over.push(InputSource {
                pos_m: centre_m(),
                samples: &zeros,
            });
        }

        let mut out_a = vec![0.0f32; C::BUFFER_SIZE];
        let mut out_b = vec![0.0f32; C::BUFFER_SIZE];
        {
            let mut outputs_a: Vec<&mut [f32]> = vec![&mut out_a];
            engine_a.process(&exact, LayoutTag::Mono, 1.0, centre_m(), &mut outputs_a);
        }
        {
            let mut outputs_b: Vec<&mut [f32]> = vec![&mut out_b];
            engine_b.process(&over, LayoutTag::Mono, 1.0, centre_m(), &mut outputs_b);
        }
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn far_out_of_mesh_centre_clamps_to_a_valid_sphere() {
        let mut engine = silent_engine();
        let zeros = vec![0.0f32; C::BUFFER_SIZE];
        let inputs = [InputSource {
            pos_m: centre_m(),
            samples: &zeros,
        }];
        let mut outs = vec![vec![0.0f32; C::BUFFER_SIZE]; 8];
        let mut out_refs: Vec<&mut [f32]> = outs.iter_mut().map(|v| v.as_mut_slice()).collect();
        engine.process(
            &inputs,
            LayoutTag::Eight,
            1.0,
            [1e9, 1e9, 1e9],
            &mut out_refs,
        );
        for buf in &outs {
            assert!(buf.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn init_with_normalised_coefficients_installs_expected_r1_r2() {
        let mut engine = DwmEngine::<C>::create();
        engine.init(&[[0.0, 0.0]; 6], true);
        assert_eq!(engine.coeffs[Z_NEG], [0.0, 0.0]);

        engine.init(&[[1.0, 1.0]; 6], true);
        for c in engine.coeffs {
            assert!((c[0] - 0.0).abs() < 1e-6);
            assert!((c[1] - 1.0).abs() < 1e-6);
        }

        engine.init(&[[1.0, 0.0]; 6], true);
        for c in engine.coeffs {
            assert!((c[0] - 0.25).abs() < 1e-6);
            assert!((c[1] - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn absorbing_walls_decay_impulse_energy_after_the_initial_transient() {
        let mut engine = silent_engine();
        let mut impulse = vec![0.0f32; C::BUFFER_SIZE];
        impulse[0] = 1.0;
        let inputs = [InputSource {
            pos_m: centre_m(),
            samples: &impulse,
        }];
        let mut out_buf = vec![0.0f32; C::BUFFER_SIZE];
        {
            let mut outputs: Vec<&mut [f32]> = vec![&mut out_buf];
            engine.process(&inputs, LayoutTag::Mono, 1.0, centre_m(), &mut outputs);
        }

        let transient = 4;
        let late_peak = out_buf[transient..]
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));
        let early_peak = out_buf[..transient]
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!(late_peak <= early_peak + 1e-6);
    }
}
