// Host-side tests for the shape library and the per-particle position function.

use aether_core::field::lattice_side;
use aether_core::noise::value_noise;
use aether_core::*;
use glam::Vec3;

fn ctx(count: u32, time: f32) -> ShapeContext {
    ShapeContext {
        count,
        lattice_side: lattice_side(count),
        time,
    }
}

fn idle_frame(mode_value: f32) -> ParticleFrame {
    ParticleFrame {
        mode_value,
        audio_level: 0.0,
        pointer: pointer_sentinel(),
    }
}

fn sample_field() -> ParticleField {
    ParticleField::new(2_000, DeviceClass::Desktop, 7)
}

#[test]
fn integer_mode_values_give_the_pure_shape() {
    let field = sample_field();
    let c = ctx(field.count(), 1.3);
    for mode in VisualMode::ALL {
        for attr in field.attrs().iter().step_by(97) {
            let blended = blended_shape(mode.index() as f32, attr, &c);
            let pure = shape_position(mode, attr, &c);
            assert_eq!(blended, pure, "mode {:?} particle {}", mode, attr.index);
        }
    }
}

#[test]
fn fractional_mode_lerps_between_neighbours() {
    let field = sample_field();
    let c = ctx(field.count(), 0.4);
    for attr in field.attrs().iter().step_by(131) {
        let a = shape_position(VisualMode::Lattice, attr, &c);
        let b = shape_position(VisualMode::Vortex, attr, &c);
        let p = blended_shape(2.25, attr, &c);
        assert!(p.distance(a.lerp(b, 0.25)) < 1e-5);
    }
}

#[test]
fn split_mode_clamps_out_of_range_values() {
    assert_eq!(
        split_mode(-3.0),
        (VisualMode::Sphere, VisualMode::Torus, 0.0)
    );
    assert_eq!(
        split_mode(42.0),
        (VisualMode::Vessel, VisualMode::Vessel, 0.0)
    );
    assert_eq!(
        split_mode(f32::NAN),
        (VisualMode::Sphere, VisualMode::Torus, 0.0)
    );
    let (lo, hi, f) = split_mode(5.5);
    assert_eq!((lo, hi), (VisualMode::Helix, VisualMode::Vessel));
    assert!((f - 0.5).abs() < 1e-6);
}

#[test]
fn position_is_continuous_across_a_mode_boundary() {
    let field = sample_field();
    let c = ctx(field.count(), 2.0);
    for attr in field.attrs().iter().step_by(53) {
        let before = particle_position(attr, &c, &idle_frame(1.999));
        let at = particle_position(attr, &c, &idle_frame(2.0));
        assert!(
            before.distance(at) < 0.05,
            "jump of {} at particle {}",
            before.distance(at),
            attr.index
        );
    }
}

#[test]
fn position_is_deterministic() {
    let field = sample_field();
    let c = ctx(field.count(), 3.7);
    let frame = ParticleFrame {
        mode_value: 4.3,
        audio_level: 0.6,
        pointer: Vec3::new(0.2, -0.1, 0.0),
    };
    for attr in field.attrs().iter().step_by(211) {
        assert_eq!(
            particle_position(attr, &c, &frame),
            particle_position(attr, &c, &frame)
        );
    }
}

#[test]
fn sphere_particles_sit_near_the_radius() {
    let field = sample_field();
    let c = ctx(field.count(), 0.0);
    for attr in field.attrs() {
        let r = shape_position(VisualMode::Sphere, attr, &c).length();
        assert!((r - SPHERE_RADIUS).abs() <= SPHERE_RADIUS * 0.021, "radius {r}");
    }
}

#[test]
fn lattice_stays_inside_its_cube() {
    let field = sample_field();
    let c = ctx(field.count(), 5.0);
    let bound = LATTICE_EXTENT * 0.5 * 3f32.sqrt() + 0.05;
    for attr in field.attrs() {
        assert!(shape_position(VisualMode::Lattice, attr, &c).length() <= bound);
    }
}

#[test]
fn lattice_is_centred_when_the_cube_is_not_full() {
    // 120000 fills 48 of 50 layers
    let count = 120_000;
    let c = ctx(count, 0.0);
    let mut sum = Vec3::ZERO;
    for index in 0..count {
        let attr = ParticleAttr {
            index,
            seed: [0.5; 3],
        };
        sum += shape_position(VisualMode::Lattice, &attr, &c);
    }
    let centroid = sum / count as f32;
    assert!(centroid.length() < 0.01, "centroid {centroid:?}");
}

#[test]
fn every_shape_is_finite_for_every_particle() {
    let field = ParticleField::new(5_000, DeviceClass::Mobile, 99);
    let c = ctx(field.count(), 12.5);
    for mode in VisualMode::ALL {
        for attr in field.attrs() {
            let p = shape_position(mode, attr, &c);
            assert!(p.is_finite(), "{:?} gave {:?}", mode, p);
        }
    }
}

#[test]
fn vessel_profile_is_positive() {
    for i in 0..=100 {
        let h = i as f32 / 100.0;
        assert!(vessel_radius(h) > 0.0);
    }
}

#[test]
fn sentinel_pointer_has_no_effect() {
    let p = Vec3::new(0.3, -1.2, 0.4);
    assert_eq!(pointer_repulsion(p, pointer_sentinel()), p);
}

#[test]
fn pointer_pushes_nearby_particles_away() {
    let pointer = Vec3::ZERO;
    let p = Vec3::new(0.4, 0.0, 0.0);
    let moved = pointer_repulsion(p, pointer);
    assert!(moved.distance(pointer) > p.distance(pointer));
}

#[test]
fn pointer_influence_vanishes_at_the_falloff_radius() {
    let p = Vec3::new(POINTER_FALLOFF_RADIUS - 1e-4, 0.0, 0.0);
    assert!(pointer_repulsion(p, Vec3::ZERO).distance(p) < 1e-3);
    let outside = Vec3::new(POINTER_FALLOFF_RADIUS + 0.01, 0.0, 0.0);
    assert_eq!(pointer_repulsion(outside, Vec3::ZERO), outside);
}

#[test]
fn audio_level_scales_positions_radially() {
    let field = sample_field();
    let c = ctx(field.count(), 1.0);
    for attr in field.attrs().iter().step_by(173) {
        let quiet = particle_position(attr, &c, &idle_frame(0.0));
        let loud = particle_position(
            attr,
            &c,
            &ParticleFrame {
                audio_level: 1.0,
                ..idle_frame(0.0)
            },
        );
        assert!(loud.distance(quiet * (1.0 + AUDIO_RADIAL_GAIN)) < 1e-4);
    }
}

#[test]
fn golden_fraction_is_a_unit_fraction() {
    for i in [0u32, 1, 2, 1_000, 119_999, u32::MAX] {
        let f = golden_fraction(i);
        assert!((0.0..1.0).contains(&f));
    }
}

#[test]
fn gradient_factor_is_clamped() {
    assert_eq!(gradient_factor(Vec3::new(0.0, 100.0, 0.0)), 1.0);
    assert_eq!(gradient_factor(Vec3::new(0.0, -100.0, 0.0)), 0.0);
    assert!((gradient_factor(Vec3::ZERO) - 0.5).abs() < 1e-6);
}

#[test]
fn value_noise_stays_in_unit_range() {
    for i in 0..200 {
        let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, i as f32 * 0.73);
        let v = value_noise(p);
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn lattice_side_covers_the_count() {
    assert_eq!(lattice_side(1), 2);
    assert_eq!(lattice_side(8), 2);
    assert_eq!(lattice_side(9), 3);
    assert_eq!(lattice_side(120_000), 50);
    assert_eq!(lattice_side(65_000), 41);
}

#[test]
fn mode_names_match_the_catalog() {
    let names: Vec<_> = VisualMode::ALL.iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        ["Sphere", "Torus", "Lattice", "Vortex", "Pyramid", "DNA Helix", "Vessel"]
    );
}
