// Host-side tests for the environment registry and manifests.

use pano_core::environment::*;

const REGISTRY: &str = r#"[
    {"id": "sala", "name": "Sala de estar", "imgPath": "/img/sala/", "presetPath": "/presets/sala.json"},
    {"name": "no id"},
    "junk",
    {"id": "cozinha", "imgPath": "/img/cozinha", "presetPath": "/presets/cozinha.json", "thumbnail": 4}
]"#;

#[test]
fn registry_skips_entries_without_id() {
    let reg = parse_registry(REGISTRY);
    let ids: Vec<&str> = reg.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["sala", "cozinha"]);
    assert_eq!(reg[1].thumbnail, None);
    assert_eq!(reg[1].display_name(), "cozinha");
    assert_eq!(reg[0].display_name(), "Sala de estar");
}

#[test]
fn unreadable_registry_is_empty() {
    assert!(parse_registry("{").is_empty());
    assert!(parse_registry(r#"{"id":"sala"}"#).is_empty());
}

#[test]
fn urls_join_without_double_slashes() {
    let reg = parse_registry(REGISTRY);
    assert_eq!(reg[0].manifest_url(), "/img/sala/manifest.json");
    assert_eq!(reg[0].image_url("/3 - Spot.png"), "/img/sala/3 - Spot.png");
    assert_eq!(reg[1].image_url("FINAL.png"), "/img/cozinha/FINAL.png");
}

#[test]
fn manifest_keeps_first_of_each_string() {
    let files = parse_manifest(r#"["FINAL.png", 3, "", "1 - A.png", "FINAL.png", null]"#);
    assert_eq!(files, vec!["FINAL.png", "1 - A.png"]);
    assert!(parse_manifest(r#"{"files": []}"#).is_empty());
}

#[test]
fn initial_environment_prefers_registered_query_param() {
    let reg = parse_registry(REGISTRY);
    assert_eq!(initial_environment(&reg, Some("cozinha")), "cozinha");
    assert_eq!(initial_environment(&reg, Some("garagem")), "sala");
    assert_eq!(initial_environment(&reg, None), "sala");
    assert_eq!(initial_environment(&[], Some("sala")), "luzes");
}

#[test]
fn lookup_falls_back_for_the_default_environment_only() {
    let reg = parse_registry(REGISTRY);
    assert_eq!(lookup(&reg, "sala").map(|e| e.img_path), Some("/img/sala/".to_string()));
    let fallback = lookup(&[], "luzes").unwrap();
    assert_eq!(fallback.manifest_url(), "/img/luzes/manifest.json");
    assert!(fallback.preset_path.is_empty());
    assert!(lookup(&reg, "garagem").is_none());
}
