// Host-side tests for scene construction and the per-frame tick.

use aether_core::*;
use glam::Vec2;

const FRAME: f32 = 1.0 / 60.0;

fn desktop() -> Scene {
    Scene::new(SceneConfig::default(), Viewport::new(1920, 1080, 1.0))
}

#[test]
fn desktop_viewport_builds_the_full_field() {
    let scene = desktop();
    assert_eq!(scene.device_class(), DeviceClass::Desktop);
    assert_eq!(scene.field().count(), 120_000);
}

#[test]
fn narrow_viewport_builds_the_mobile_field() {
    // 750 backing px at dpr 2 is a 375 css px container
    let scene = Scene::new(SceneConfig::default(), Viewport::new(750, 1334, 2.0));
    assert_eq!(scene.device_class(), DeviceClass::Mobile);
    assert_eq!(scene.field().count(), 65_000);
}

#[test]
fn mobile_count_never_exceeds_desktop_count() {
    let config = SceneConfig {
        desktop_particles: 1_000,
        ..SceneConfig::default()
    };
    assert_eq!(config.particle_count(DeviceClass::Mobile), 1_000);
}

#[test]
fn pixel_ratio_is_clamped() {
    let config = SceneConfig::default();
    assert_eq!(config.clamp_pixel_ratio(3.0), MAX_PIXEL_RATIO);
    assert_eq!(config.clamp_pixel_ratio(0.5), 1.0);
    assert_eq!(config.clamp_pixel_ratio(1.5), 1.5);
}

#[test]
fn seeds_are_in_unit_range_and_indices_are_sequential() {
    let field = ParticleField::new(10_000, DeviceClass::Desktop, FIELD_SEED);
    for (i, attr) in field.attrs().iter().enumerate() {
        assert_eq!(attr.index as usize, i);
        for s in attr.seed {
            assert!((0.0..1.0).contains(&s));
        }
    }
    assert_eq!(field.as_bytes().len(), 10_000 * 16);
}

#[test]
fn audio_level_decays_within_three_seconds_after_playback_stops() {
    let mut scene = desktop();
    for _ in 0..120 {
        scene.tick(FRAME, Some(0.8));
    }
    let peak = scene.audio_level();
    assert!(peak > 0.7);
    for _ in 0..180 {
        scene.tick(FRAME, None);
    }
    assert!(scene.audio_level() <= peak * 0.01);
}

#[test]
fn resize_keeps_the_field_untouched() {
    let mut scene = desktop();
    let before = scene.field().attrs().to_vec();
    scene.resize(Viewport::new(1280, 720, 1.0));
    assert_eq!(scene.field().attrs(), &before[..]);
    assert!((scene.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    assert_eq!(scene.uniforms().view[0], 1280.0);
}

#[test]
fn tick_clamps_long_and_invalid_frame_times() {
    let mut scene = desktop();
    scene.tick(5.0, None);
    assert!((scene.time() - MAX_FRAME_DT_SEC).abs() < 1e-6);
    scene.tick(f32::NAN, None);
    scene.tick(-1.0, None);
    assert!((scene.time() - MAX_FRAME_DT_SEC).abs() < 1e-6);
    assert_eq!(scene.frames(), 3);
}

#[test]
fn uniforms_reflect_scene_state() {
    let mut scene = desktop();
    scene.set_mode(2).unwrap();
    let u = scene.tick(FRAME, None);
    assert_eq!(u.params[3], 120_000.0);
    assert_eq!(u.view[3], 50.0);
    assert!((u.params[1] - 0.1).abs() < 1e-4);
    assert_eq!(u.params[2], 0.0);
    assert_eq!(u.pointer[3], 0.0);
    assert_eq!(u.color1[3], 1.0);
    assert_eq!(std::mem::size_of::<ParticleUniforms>(), 144);
}

#[test]
fn tick_applies_inputs_before_packing() {
    let mut scene = desktop();
    scene.set_mode(1).unwrap();
    let u = scene.tick(FRAME, Some(1.0));
    // the returned block already carries this tick's blend and audio step
    assert_eq!(u.params[1], scene.blend().mode_value());
    assert_eq!(u.params[2], scene.audio_level());
    assert!(u.params[1] > 0.0 && u.params[2] > 0.0);
    assert_eq!(u, scene.uniforms());
}

#[test]
fn pointer_enters_and_leaves_the_field() {
    let mut scene = desktop();
    scene.pointer_moved(Vec2::new(0.5, 0.5));
    let u = scene.tick(FRAME, None);
    assert_eq!(u.pointer[3], 1.0);
    assert!(Vec2::new(u.pointer[0], u.pointer[1]).length() < 1e-3);
    assert!(u.pointer[2].abs() < 1e-3);

    scene.pointer_left();
    let u = scene.tick(FRAME, None);
    assert_eq!(u.pointer[3], 0.0);
    assert_eq!(scene.pointer().smoothed(), pointer_sentinel());
}

#[test]
fn pointer_follows_with_smoothing() {
    let mut scene = desktop();
    scene.pointer_moved(Vec2::new(0.5, 0.5));
    scene.tick(FRAME, None);
    scene.pointer_moved(Vec2::new(0.75, 0.5));
    scene.tick(FRAME, None);
    let target = scene.pointer().target();
    let smoothed = scene.pointer().smoothed();
    assert!(target.x > 0.0);
    assert!(smoothed.x > 0.0 && smoothed.x < target.x);
}

#[test]
fn invalid_mode_is_reported() {
    let mut scene = desktop();
    assert_eq!(scene.set_mode(12), Err(AetherError::UnknownMode(12)));
    assert_eq!(scene.set_palette(9), Err(AetherError::UnknownPalette(9)));
}

#[test]
fn screen_centre_maps_to_origin() {
    let camera = Camera::default();
    let hit = camera.screen_to_plane(Vec2::new(0.5, 0.5), 0.0).unwrap();
    assert!(hit.length() < 1e-4);
    let right = camera.screen_to_plane(Vec2::new(1.0, 0.5), 0.0).unwrap();
    assert!(right.x > 0.0);
    let top = camera.screen_to_plane(Vec2::new(0.5, 0.0), 0.0).unwrap();
    assert!(top.y > 0.0);
}
