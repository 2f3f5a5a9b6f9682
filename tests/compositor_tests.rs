// Host-side tests for layer composition, smoothing and colour adjustments.

use pano_core::compositor::{compose, Adjustments, Blend, LayerDraw, OpacitySmoother};
use pano_core::{LightBoard, ViewMode};

const FILES: [&str; 3] = ["0 - Dome.png", "3 - Spot.png", "FINAL.png"];

fn stack(mode: ViewMode) -> Vec<LayerDraw> {
    let board = LightBoard::from_files(&FILES);
    compose(board.files(), mode, &board)
}

#[test]
fn lights_mode_stacks_additive_lights_over_hidden_final() {
    let s = stack(ViewMode::Lights);
    let files: Vec<&str> = s.iter().map(|d| d.file.as_str()).collect();
    assert_eq!(files, vec!["FINAL.png", "0 - Dome.png", "3 - Spot.png"]);
    assert_eq!(s[0].opacity, 0.0);
    assert_eq!(s[0].blend, Blend::Normal);
    for d in &s[1..] {
        assert!((d.opacity - 0.5).abs() < 1e-6);
        assert_eq!(d.blend, Blend::Additive);
    }
}

#[test]
fn final_mode_shows_only_the_primary_final() {
    let s = stack(ViewMode::Final);
    assert_eq!(s[0].opacity, 1.0);
    assert!(s[1..].iter().all(|d| d.opacity == 0.0));
    assert!(s[0].visible());
    assert!(!s[1].visible());
}

#[test]
fn final_variants_follow_their_intensity() {
    let files = ["FINAL.png", "FINAL_NOITE.png", "1 - A.png"];
    let mut board = LightBoard::from_files(&files);
    let s = compose(board.files(), ViewMode::Final, &board);
    let noite = s.iter().find(|d| d.file == "FINAL_NOITE.png").unwrap();
    assert_eq!(noite.opacity, 0.0);
    board.set_intensity("FINAL_NOITE.png", 100.0);
    let s = compose(board.files(), ViewMode::Final, &board);
    let noite = s.iter().find(|d| d.file == "FINAL_NOITE.png").unwrap();
    assert_eq!(noite.opacity, 1.0);
}

#[test]
fn switched_off_light_is_transparent() {
    let mut board = LightBoard::from_files(&FILES);
    board.toggle_on("3 - Spot.png");
    let s = compose(board.files(), ViewMode::Lights, &board);
    let spot = s.iter().find(|d| d.file == "3 - Spot.png").unwrap();
    assert_eq!(spot.opacity, 0.0);
}

#[test]
fn layers_unknown_to_the_board_are_transparent() {
    let board = LightBoard::from_files(&FILES);
    let layers = vec!["ghost.png".to_string(), "3 - Spot.png".to_string()];
    let s = compose(&layers, ViewMode::Lights, &board);
    assert_eq!(s[0].opacity, 0.0);
    assert!((s[1].opacity - 0.5).abs() < 1e-6);
}

#[test]
fn smoother_approaches_target_and_settles() {
    let target = stack(ViewMode::Lights);
    let mut sm = OpacitySmoother::new();
    let first = sm.step(&target, 0.016);
    assert!(first[1].opacity > 0.0 && first[1].opacity < 0.5);
    assert!(!sm.settled(&target));
    for _ in 0..200 {
        sm.step(&target, 0.016);
    }
    assert!(sm.settled(&target));
}

#[test]
fn smoother_ignores_bad_dt_and_snaps() {
    let target = stack(ViewMode::Final);
    let mut sm = OpacitySmoother::new();
    let out = sm.step(&target, f32::NAN);
    assert_eq!(out[0].opacity, 0.0);
    sm.snap(&target);
    assert!(sm.settled(&target));
    let out = sm.step(&target, 0.0);
    assert_eq!(out[0].opacity, 1.0);
}

#[test]
fn neutral_adjustments() {
    let a = Adjustments::default();
    assert_eq!(a.tint(), glam::Vec3::ONE);
    assert_eq!(
        a.css_filter(),
        "saturate(100%) contrast(100%) brightness(100%) blur(0px)"
    );
    assert_eq!(a.bloom_strength(), 0.0);
    assert_eq!(a.highlight_boost(), 0.0);
}

#[test]
fn adjustments_clamp_and_tint_warm_or_cool() {
    let a = Adjustments {
        temperature: 100.0,
        saturation: 500.0,
        bloom: f32::NAN,
        ..Adjustments::default()
    }
    .clamped();
    assert_eq!(a.temperature, 40.0);
    assert_eq!(a.saturation, 200.0);
    assert_eq!(a.bloom, 0.0);
    assert!(a
        .tint()
        .abs_diff_eq(glam::Vec3::from(pano_core::constants::WARM_TINT), 1e-6));
    let cool = Adjustments {
        temperature: -40.0,
        ..Adjustments::default()
    };
    assert!(cool
        .tint()
        .abs_diff_eq(glam::Vec3::from(pano_core::constants::COOL_TINT), 1e-6));
}

#[test]
fn adjustments_decode_leniently() {
    let a: Adjustments =
        serde_json::from_str(r#"{"temperature":"12","saturation":null,"bloom":300}"#).unwrap();
    assert_eq!(a.temperature, 12.0);
    assert_eq!(a.saturation, 100.0);
    assert_eq!(a.bloom, 100.0);
}
