// Host-side tests for constants and their relationships.

use aether_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn particle_budgets_are_ordered() {
    assert!(MOBILE_PARTICLE_COUNT < DESKTOP_PARTICLE_COUNT);
    assert!(MOBILE_BREAKPOINT_PX > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn decay_rates_are_fractions() {
    for rate in [
        MODE_DECAY_PER_FRAME,
        COLOR_DECAY_PER_FRAME,
        AUDIO_LEVEL_DECAY_PER_FRAME,
        POINTER_DECAY_PER_FRAME,
    ] {
        assert!(rate > 0.0 && rate < 1.0);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn shapes_fit_inside_the_view() {
    // the camera sees roughly +-3.7 units at the origin plane
    let half_view = CAMERA_Z * (CAMERA_FOVY_DEG.to_radians() * 0.5).tan();
    let extents = [
        SPHERE_RADIUS,
        TORUS_MAJOR_RADIUS + TORUS_MINOR_RADIUS,
        LATTICE_EXTENT * 0.5 * 3f32.sqrt(),
        VORTEX_RADIUS,
        HELIX_HEIGHT * 0.5,
        VESSEL_HEIGHT * 0.5,
    ];
    for e in extents {
        assert!(e * (1.0 + AUDIO_RADIAL_GAIN) < half_view * 1.2, "extent {e}");
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn pointer_sentinel_is_beyond_the_far_threshold() {
    for c in POINTER_SENTINEL {
        assert!(c >= POINTER_FAR_THRESHOLD);
    }
    assert!(POINTER_FAR_THRESHOLD > POINTER_FALLOFF_RADIUS * 10.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_timing_is_consistent() {
    assert!(MASTER_FADE_OUT_SEC > 0.0);
    assert!(MASTER_FADE_IN_SEC > MASTER_FADE_OUT_SEC);
    assert!(SCHEDULER_LOOKAHEAD_SEC > 0.0 && SCHEDULER_LOOKAHEAD_SEC < 1.0);
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!(ANALYSER_LOW_BINS <= ANALYSER_FFT_SIZE as usize / 2);
}

#[test]
fn noise_table_has_one_entry_per_mode() {
    assert_eq!(SHAPE_NOISE_AMPLITUDE.len(), MODE_COUNT);
    for (mode, amp) in VisualMode::ALL.iter().zip(SHAPE_NOISE_AMPLITUDE) {
        assert_eq!(mode.noise_amplitude(), amp);
    }
}

#[test]
fn shaders_are_bundled() {
    assert!(PARTICLES_WGSL.contains("fn vs_main"));
    assert!(PARTICLES_WGSL.contains("fn fs_main"));
    for entry in ["fn vs_fullscreen", "fn fs_bright", "fn fs_blur", "fn fs_composite"] {
        assert!(POST_WGSL.contains(entry), "{entry}");
    }
}

/// `const NAME: T = VALUE;` lines of a WGSL source, with integer suffixes stripped.
fn wgsl_consts(src: &str) -> Vec<(String, f32)> {
    src.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("const ")?;
            let (name, rest) = rest.split_once(':')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_end_matches(';').trim_end_matches('u');
            Some((name.trim().to_string(), value.parse().ok()?))
        })
        .collect()
}

#[test]
fn particle_shader_constants_match_the_rust_mirror() {
    let consts = wgsl_consts(PARTICLES_WGSL);
    let expected: &[(&str, f32)] = &[
        ("SPHERE_RADIUS", SPHERE_RADIUS),
        ("TORUS_MAJOR_RADIUS", TORUS_MAJOR_RADIUS),
        ("TORUS_MINOR_RADIUS", TORUS_MINOR_RADIUS),
        ("LATTICE_EXTENT", LATTICE_EXTENT),
        ("VORTEX_RADIUS", VORTEX_RADIUS),
        ("PYRAMID_HALF_BASE", PYRAMID_HALF_BASE),
        ("PYRAMID_HEIGHT", PYRAMID_HEIGHT),
        ("HELIX_RADIUS", HELIX_RADIUS),
        ("HELIX_HEIGHT", HELIX_HEIGHT),
        ("VESSEL_HEIGHT", VESSEL_HEIGHT),
        ("VESSEL_RINGS", VESSEL_RINGS as f32),
        ("VESSEL_SEGMENTS", VESSEL_SEGMENTS as f32),
        ("NOISE_FREQUENCY", NOISE_FREQUENCY),
        ("NOISE_SPEED", NOISE_SPEED),
        ("AUDIO_RADIAL_GAIN", AUDIO_RADIAL_GAIN),
        ("POINTER_FALLOFF_RADIUS", POINTER_FALLOFF_RADIUS),
        ("POINTER_PUSH", POINTER_PUSH),
        ("POINTER_SWIRL", POINTER_SWIRL),
        ("SIZE_REFERENCE_DEPTH", CAMERA_Z),
    ];
    for (name, value) in expected {
        let found = consts
            .iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("{name} missing from particles.wgsl"));
        assert_eq!(found.1, *value, "{name}");
    }
}

#[test]
fn particle_shader_noise_table_matches() {
    let start = PARTICLES_WGSL
        .find("fn noise_amplitude")
        .expect("noise_amplitude in particles.wgsl");
    let body = &PARTICLES_WGSL[start..];
    let body = &body[..body.find("\n}").expect("end of noise_amplitude")];
    let table: Vec<f32> = body
        .split("return ")
        .skip(1)
        .filter_map(|s| s.split(';').next()?.trim().parse().ok())
        .collect();
    assert_eq!(table, SHAPE_NOISE_AMPLITUDE.to_vec());
}
