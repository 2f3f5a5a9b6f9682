// Host-side tests for filename labels, grouping and light ordering.

use pano_core::labels::*;

#[test]
fn sanitize_label_strips_prefix_extension_and_separators() {
    assert_eq!(sanitize_label("3 - Spot.png"), "SPOT");
    assert_eq!(sanitize_label("0 - Dome.png"), "DOME");
    assert_eq!(sanitize_label("12_sala-estar.jpg"), "SALA ESTAR");
    assert_eq!(sanitize_label("img/luzes/5 - Pendente.png"), "PENDENTE");
    assert_eq!(sanitize_label("FINAL.png"), "FINAL");
}

#[test]
fn sanitize_label_is_total() {
    assert_eq!(sanitize_label(""), "");
    assert_eq!(sanitize_label("42.png"), "");
}

#[test]
fn extract_group_uses_leading_digits_or_others() {
    assert_eq!(extract_group("12_sala.png"), "12");
    assert_eq!(extract_group("3 - Spot.png"), "3");
    assert_eq!(extract_group("Dome.png"), "OUTROS");
    assert_eq!(extract_group("img/7 - Lamp.png"), "7");
}

#[test]
fn final_detection_separates_primary_from_variants() {
    assert!(is_final("FINAL.png"));
    assert!(is_primary_final("FINAL.png"));
    assert!(is_primary_final("Sala FINAL.jpg"));
    assert!(is_final("FINAL_NOITE.png"));
    assert!(!is_primary_final("FINAL_NOITE.png"));
    assert!(!is_final("3 - Spot.png"));
}

#[test]
fn final_must_be_a_whole_token() {
    assert!(!is_final("5 - FINALIZACAO.png"));
    assert!(!is_final("Semifinal.png"));
    assert!(!is_primary_final("SEMIFINAL.png"));
    assert!(is_final("Cozinha-FINAL-dia.jpg"));
    assert!(is_primary_final("cozinha_final.png"));
    let sorted = sort_lights(&["5 - FINALIZACAO.png", "FINAL.png"]);
    assert_eq!(sorted, vec!["FINAL.png", "5 - FINALIZACAO.png"]);
}

#[test]
fn primary_final_prefers_primary_then_any_final() {
    let layers = ["FINAL_NOITE.png", "1 - A.png", "FINAL.png"];
    assert_eq!(primary_final(&layers), Some("FINAL.png"));
    let only_variant = ["1 - A.png", "FINAL_NOITE.png"];
    assert_eq!(primary_final(&only_variant), Some("FINAL_NOITE.png"));
    let none = ["1 - A.png"];
    assert_eq!(primary_final(&none), None);
    assert_eq!(
        final_variants(&layers),
        vec!["FINAL_NOITE.png".to_string()]
    );
}

#[test]
fn sort_lights_puts_final_first_then_case_insensitive() {
    let files = ["3 - Spot.png", "0 - Dome.png", "FINAL.png", "b.png", "A.png"];
    assert_eq!(
        sort_lights(&files),
        vec!["FINAL.png", "0 - Dome.png", "3 - Spot.png", "A.png", "b.png"]
    );
}

#[test]
fn group_by_number_orders_numerically_with_others_last() {
    let files = ["10 - a.png", "2 - b.png", "x.png", "2 - c.png"];
    let groups = group_by_number(&files);
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["2", "10", "OUTROS"]);
    assert_eq!(groups[0].files, vec!["2 - b.png", "2 - c.png"]);
}

#[test]
fn daylight_suggestions_pick_dome_cortina_and_zero_prefix() {
    let files = [
        "0 - Dome.png",
        "3 - Cortina.png",
        "5 - Spot.png",
        "FINAL.png",
        "7 - Dome Externo.png",
    ];
    assert_eq!(
        suggest_daylight_targets(&files),
        vec!["0 - Dome.png", "3 - Cortina.png", "7 - Dome Externo.png"]
    );
}
