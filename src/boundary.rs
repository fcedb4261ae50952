//! The Kelloniemi frequency-dependent 1-D boundary condition.
//!
//! One `BoundaryState` lives at each junction of each of the six mesh
//! faces. Structurally this is the same three-state IIR recursion as the
//! comb/allpass filters elsewhere in this codebase, just with its own
//! closed-form update rather than a delay line.

/// Per-wall-junction recursive filter state, `(t1, t2, t3)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundaryState {
    t1: f32,
    t2: f32,
    t3: f32,
}

impl BoundaryState {
    pub const fn new() -> Self {
        Self {
            t1: 0.0,
            t2: 0.0,
            t3: 0.0,
        }
    }

    /// Advance this plane cell's state by one step and filter `input`.
    ///
    /// `coeffs` is `[R1, R2]`: R1 controls static admittance, R2 the
    /// low-pass cutoff, per Kelloniemi, Antti. "Frequency-dependent
    /// boundary condition for the 3-D digital waveguide mesh." Proc. Int.
    /// Conf. Digital Audio Effects (DAFx'06). 2006.
    #[inline]
    pub fn process(&mut self, input: f32, coeffs: [f32; 2]) -> f32 {
        let [r1, r2] = coeffs;
        let aux = input - self.t1;
        let out = r1 * (aux + self.t3) + (1.0 + r2) * self.t2;
        self.t3 = self.t2;
        self.t1 = out - self.t2;
        self.t2 = aux;
        out
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Convert normalised `(admittance, cutoff)` in `[0, 1]` to `(R1, R2)`.
#[inline]
pub fn normalised_to_r1r2(admittance: f32, cutoff: f32) -> [f32; 2] {
    let r1 = (1.0 - cutoff) * 0.25 * admittance;
    let r2 = admittance * (1.0 - (1.0 - cutoff) * 0.5);
    [r1, r2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_zeroed() {
        assert_eq!(BoundaryState::new(), BoundaryState::default());
    }

    #[test]
    fn zero_input_with_zero_coeffs_stays_silent() {
        let mut b = BoundaryState::new();
        for _ in 0..16 {
            assert_eq!(b.process(0.0, [0.0, 0.0]), 0.0);
        }
    }

    #[test]
    fn clear_resets_recursive_state() {
        let mut b = BoundaryState::new();
        b.process(1.0, [0.5, 0.2]);
        assert_ne!(b, BoundaryState::new());
        b.clear();
        assert_eq!(b, BoundaryState::new());
    }

    #[test]
    fn normalised_zero_zero_is_rigid_zero() {
        assert_eq!(normalised_to_r1r2(0.0, 0.0), [0.0, 0.0]);
    }

    #[test]
    fn normalised_one_one_maps_to_zero_one() {
        let [r1, r2] = normalised_to_r1r2(1.0, 1.0);
        assert!((r1 - 0.0).abs() < 1e-6);
        assert!((r2 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalised_one_zero_maps_to_quarter_half() {
        let [r1, r2] = normalised_to_r1r2(1.0, 0.0);
        assert!((r1 - 0.25).abs() < 1e-6);
        assert!((r2 - 0.5).abs() < 1e-6);
    }
}
