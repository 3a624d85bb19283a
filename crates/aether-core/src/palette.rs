use glam::Vec3;

/// A named pair of gradient endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    pub c1: [f32; 3],
    pub c2: [f32; 3],
}

impl Palette {
    pub fn colors(&self) -> (Vec3, Vec3) {
        (Vec3::from_array(self.c1), Vec3::from_array(self.c2))
    }
}

pub const PALETTES: &[Palette] = &[
    Palette {
        name: "Aurora",
        c1: [0.10, 0.85, 0.75], // teal
        c2: [0.55, 0.25, 0.95], // violet
    },
    Palette {
        name: "Ember",
        c1: [1.00, 0.42, 0.10], // orange
        c2: [0.85, 0.08, 0.30], // crimson
    },
    Palette {
        name: "Glacier",
        c1: [0.70, 0.90, 1.00], // ice
        c2: [0.15, 0.35, 0.95], // deep blue
    },
    Palette {
        name: "Solar",
        c1: [1.00, 0.85, 0.30], // gold
        c2: [1.00, 0.35, 0.55], // rose
    },
    Palette {
        name: "Verdant",
        c1: [0.55, 1.00, 0.40], // lime
        c2: [0.05, 0.55, 0.45], // jade
    },
];

pub fn palette(index: usize) -> Option<&'static Palette> {
    PALETTES.get(index)
}
