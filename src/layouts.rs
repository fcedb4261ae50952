//! Microphone-array layout catalogue.
//!
//! Every offset is stored in junction units and scaled by
//! `junction_spacing_m * mic_scale` at sample time — the one convention the
//! catalogue follows throughout, picked over the mixed junction/metric
//! conventions used across revisions of the reference implementation this
//! crate's numerics are grounded on.

/// A microphone-array configuration tag. Unknown/invalid tags resolve to
/// `Mono`, mirroring the reference implementation's defensive default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutTag {
    Mono,
    Stereo,
    Six,
    Eight,
    Twelve,
    TwentyFour,
    Thirty,
    FortyEight,
}

/// An immutable microphone-array geometry.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Largest offset magnitude, in junction units (0 for the mono layout).
    pub radius_j: f32,
    /// Per-channel offsets from the array centre, in junction units.
    pub offsets: &'static [[i32; 3]],
}

impl Layout {
    pub fn channel_count(&self) -> usize {
        self.offsets.len()
    }
}

const MONO_OFFSETS: [[i32; 3]; 1] = [[0, 0, 0]];
const STEREO_OFFSETS: [[i32; 3]; 2] = [[-1, 0, 0], [1, 0, 0]];

const SIX_OFFSETS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
    [0, 0, 1],
    [0, 1, 0],
    [1, 0, 0],
];

const EIGHT_OFFSETS: [[i32; 3]; 8] = [
    [-1, -1, -1],
    [-1, -1, 1],
    [-1, 1, -1],
    [-1, 1, 1],
    [1, -1, -1],
    [1, -1, 1],
    [1, 1, -1],
    [1, 1, 1],
];

const TWELVE_OFFSETS: [[i32; 3]; 12] = [
    [-1, -1, 0],
    [-1, 0, -1],
    [-1, 0, 1],
    [-1, 1, 0],
    [0, -1, -1],
    [0, -1, 1],
    [0, 1, -1],
    [0, 1, 1],
    [1, -1, 0],
    [1, 0, -1],
    [1, 0, 1],
    [1, 1, 0],
];

const TWENTY_FOUR_OFFSETS: [[i32; 3]; 24] = [
    [-2, -1, 0],
    [-2, 0, -1],
    [-2, 0, 1],
    [-2, 1, 0],
    [-1, -2, 0],
    [-1, 0, -2],
    [-1, 0, 2],
    [-1, 2, 0],
    [0, -2, -1],
    [0, -2, 1],
    [0, -1, -2],
    [0, -1, 2],
    [0, 1, -2],
    [0, 1, 2],
    [0, 2, -1],
    [0, 2, 1],
    [1, -2, 0],
    [1, 0, -2],
    [1, 0, 2],
    [1, 2, 0],
    [2, -1, 0],
    [2, 0, -1],
    [2, 0, 1],
    [2, 1, 0],
];

const THIRTY_OFFSETS: [[i32; 3]; 30] = [
    [-3, 0, 0],
    [-2, -2, -1],
    [-2, -2, 1],
    [-2, -1, -2],
    [-2, -1, 2],
    [-2, 1, -2],
    [-2, 1, 2],
    [-2, 2, -1],
    [-2, 2, 1],
    [-1, -2, -2],
    [-1, -2, 2],
    [-1, 2, -2],
    [-1, 2, 2],
    [0, -3, 0],
    [0, 0, -3],
    [0, 0, 3],
    [0, 3, 0],
    [1, -2, -2],
    [1, -2, 2],
    [1, 2, -2],
    [1, 2, 2],
    [2, -2, -1],
    [2, -2, 1],
    [2, -1, -2],
    [2, -1, 2],
    [2, 1, -2],
    [2, 1, 2],
    [2, 2, -1],
    [2, 2, 1],
    [3, 0, 0],
];

const FORTY_EIGHT_OFFSETS: [[i32; 3]; 48] = [
    [-3, -2, -1],
    [-3, -2, 1],
    [-3, -1, -2],
    [-3, -1, 2],
    [-3, 1, -2],
    [-3, 1, 2],
    [-3, 2, -1],
    [-3, 2, 1],
    [-2, -3, -1],
    [-2, -3, 1],
    [-2, -1, -3],
    [-2, -1, 3],
    [-2, 1, -3],
    [-2, 1, 3],
    [-2, 3, -1],
    [-2, 3, 1],
    [-1, -3, -2],
    [-1, -3, 2],
    [-1, -2, -3],
    [-1, -2, 3],
    [-1, 2, -3],
    [-1, 2, 3],
    [-1, 3, -2],
    [-1, 3, 2],
    [1, -3, -2],
    [1, -3, 2],
    [1, -2, -3],
    [1, -2, 3],
    [1, 2, -3],
    [1, 2, 3],
    [1, 3, -2],
    [1, 3, 2],
    [2, -3, -1],
    [2, -3, 1],
    [2, -1, -3],
    [2, -1, 3],
    [2, 1, -3],
    [2, 1, 3],
    [2, 3, -1],
    [2, 3, 1],
    [3, -2, -1],
    [3, -2, 1],
    [3, -1, -2],
    [3, -1, 2],
    [3, 1, -2],
    [3, 1, 2],
    [3, 2, -1],
    [3, 2, 1],
];

pub static MONO: Layout = Layout {
    radius_j: 0.0,
    offsets: &MONO_OFFSETS,
};
pub static STEREO: Layout = Layout {
    radius_j: 1.0,
    offsets: &STEREO_OFFSETS,
};
pub static SIX: Layout = Layout {
    radius_j: 1.0,
    offsets: &SIX_OFFSETS,
};
pub static EIGHT: Layout = Layout {
    radius_j: 1.732_050_8,
    offsets: &EIGHT_OFFSETS,
};
pub static TWELVE: Layout = Layout {
    radius_j: 1.414_213_6,
    offsets: &TWELVE_OFFSETS,
};
pub static TWENTY_FOUR: Layout = Layout {
    radius_j: 2.236_068,
    offsets: &TWENTY_FOUR_OFFSETS,
};
pub static THIRTY: Layout = Layout {
    radius_j: 3.0,
    offsets: &THIRTY_OFFSETS,
};
pub static FORTY_EIGHT: Layout = Layout {
    radius_j: 3.741_657_4,
    offsets: &FORTY_EIGHT_OFFSETS,
};

/// Resolve a configuration tag to its layout.
pub fn layout_for(tag: LayoutTag) -> &'static Layout {
    match tag {
        LayoutTag::Mono => &MONO,
        LayoutTag::Stereo => &STEREO,
        LayoutTag::Six => &SIX,
        LayoutTag::Eight => &EIGHT,
        LayoutTag::Twelve => &TWELVE,
        LayoutTag::TwentyFour => &TWENTY_FOUR,
        LayoutTag::Thirty => &THIRTY,
        LayoutTag::FortyEight => &FORTY_EIGHT,
    }
}

/// Resolve an external, caller-supplied tag name to a `LayoutTag`. This is
/// the seam where an out-of-range or misspelled configuration value from a
/// host application is normalised: anything not recognised below resolves
/// to `LayoutTag::Mono`, matching the reference implementation's
/// `ma_config_layout` switch-with-default.
pub fn resolve_tag(raw: &str) -> LayoutTag {
    match raw.to_ascii_lowercase().as_str() {
        "stereo" => LayoutTag::Stereo,
        "six" | "6" => LayoutTag::Six,
        "eight" | "8" => LayoutTag::Eight,
        "twelve" | "12" => LayoutTag::Twelve,
        "twenty_four" | "twenty-four" | "24" => LayoutTag::TwentyFour,
        "thirty" | "30" => LayoutTag::Thirty,
        "forty_eight" | "forty-eight" | "48" => LayoutTag::FortyEight,
        _ => {
            crate::rt_eprintln!("[dwm_mesh] unrecognised layout tag {raw:?}, falling back to mono");
            LayoutTag::Mono
        }
    }
}
