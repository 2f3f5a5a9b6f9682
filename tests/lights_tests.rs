// Host-side tests for the light board: defaults, daylight fan-out and bulk actions.

use pano_core::constants::{DAYLIGHT_KEY, DEFAULT_LIGHT_INTENSITY, MAX_INTENSITY};
use pano_core::LightBoard;

const FILES: [&str; 4] = ["0 - Dome.png", "3 - Spot.png", "5 - Cortina.png", "FINAL.png"];

fn board() -> LightBoard {
    LightBoard::from_files(&FILES)
}

#[test]
fn fresh_board_defaults() {
    let b = board();
    assert_eq!(b.files()[0], "FINAL.png");
    assert_eq!(b.intensity("FINAL.png"), 0.0);
    assert_eq!(b.intensity("3 - Spot.png"), DEFAULT_LIGHT_INTENSITY);
    assert_eq!(b.daylight(), 50.0);
    assert!(b.light("FINAL.png").is_none());
    let spot = b.light("3 - Spot.png").unwrap();
    assert!(spot.on);
    assert!(!spot.dimmable);
    assert_eq!(spot.display_name, "SPOT");
    assert!(b.contains("FINAL.png"));
    assert!(!b.contains(DAYLIGHT_KEY));
}

#[test]
fn daylight_fans_out_to_targets_only() {
    let mut b = board();
    b.set_daylight_targets(&["0 - Dome.png", "5 - Cortina.png"]);
    b.set_intensity(DAYLIGHT_KEY, 80.0);
    assert_eq!(b.daylight(), 80.0);
    assert_eq!(b.intensity("0 - Dome.png"), 80.0);
    assert_eq!(b.intensity("5 - Cortina.png"), 80.0);
    assert_eq!(b.intensity("3 - Spot.png"), DEFAULT_LIGHT_INTENSITY);
}

#[test]
fn daylight_targets_drop_unknown_final_and_duplicates() {
    let mut b = board();
    b.set_daylight_targets(&["FINAL.png", "nope.png", "0 - Dome.png", "0 - Dome.png"]);
    assert_eq!(b.daylight_targets(), ["0 - Dome.png".to_string()]);
    b.toggle_daylight_target("0 - Dome.png");
    assert!(b.daylight_targets().is_empty());
    b.toggle_daylight_target("FINAL.png");
    assert!(!b.is_daylight_target("FINAL.png"));
}

#[test]
fn intensity_is_clamped_and_non_finite_is_zero() {
    let mut b = board();
    b.set_intensity("3 - Spot.png", 150.0);
    assert_eq!(b.intensity("3 - Spot.png"), MAX_INTENSITY);
    b.set_intensity("3 - Spot.png", -4.0);
    assert_eq!(b.intensity("3 - Spot.png"), 0.0);
    b.set_intensity("3 - Spot.png", f32::NAN);
    assert_eq!(b.intensity("3 - Spot.png"), 0.0);
    b.set_intensity("missing.png", 10.0);
    assert_eq!(b.intensity("missing.png"), 0.0);
}

#[test]
fn moving_a_dimmable_slider_turns_it_on() {
    let mut b = board();
    b.toggle_dimmable("3 - Spot.png");
    b.toggle_on("3 - Spot.png");
    assert_eq!(b.opacity("3 - Spot.png"), 0.0);
    b.set_intensity("3 - Spot.png", 30.0);
    assert!(b.light("3 - Spot.png").unwrap().on);
    assert!((b.opacity("3 - Spot.png") - 0.3).abs() < 1e-6);
    assert_eq!(b.dimmable_lights(), vec!["3 - Spot.png"]);
}

#[test]
fn all_off_keeps_daylight_targets() {
    let mut b = board();
    b.set_daylight_targets(&["0 - Dome.png"]);
    b.turn_off_except_daylight();
    assert!(b.light("0 - Dome.png").unwrap().on);
    assert_eq!(b.intensity("0 - Dome.png"), DEFAULT_LIGHT_INTENSITY);
    assert!(!b.light("3 - Spot.png").unwrap().on);
    assert_eq!(b.intensity("3 - Spot.png"), 0.0);
}

#[test]
fn preset_all_without_preset_forces_full_on() {
    let mut b = board();
    b.turn_off_except_daylight();
    b.preset_all(None);
    for (file, light) in b.lights() {
        assert!(light.on, "{file} should be on");
        assert_eq!(b.intensity(file), MAX_INTENSITY);
    }
    assert_eq!(b.intensity("FINAL.png"), 0.0);
}

#[test]
fn layer_visibility_toggles_between_zero_and_full() {
    let mut b = board();
    b.toggle_layer_visibility("FINAL.png");
    assert_eq!(b.intensity("FINAL.png"), MAX_INTENSITY);
    b.toggle_layer_visibility("FINAL.png");
    assert_eq!(b.intensity("FINAL.png"), 0.0);
}

#[test]
fn light_groups_cover_non_final_files() {
    let groups = board().light_groups();
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["0", "3", "5"]);
}
