//! Filename → label / group mapping and the canonical light ordering.
//!
//! All functions here are pure and total: any string in, a well-formed value out.

use crate::constants::OTHERS_GROUP;
use std::cmp::Ordering;

/// Files sharing one leading numeric prefix, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightGroup {
    pub key: String,
    pub files: Vec<String>,
}

#[inline]
fn base_name(filename: &str) -> &str {
    match filename.rfind(['/', '\\']) {
        Some(i) => &filename[i + 1..],
        None => filename,
    }
}

/// Base name without its last extension (`a.b.png` → `a.b`).
fn stem(filename: &str) -> &str {
    let base = base_name(filename);
    match base.rfind('.') {
        Some(i) if i + 1 < base.len() => &base[..i],
        _ => base,
    }
}

/// Human-readable label: no path, no extension, separators as spaces, one
/// leading number dropped, trimmed and uppercased.
pub fn sanitize_label(filename: &str) -> String {
    let mut cleaned = String::with_capacity(filename.len());
    let mut in_sep = false;
    for ch in stem(filename).chars() {
        if matches!(ch, '.' | '_' | '-') {
            if !in_sep {
                cleaned.push(' ');
            }
            in_sep = true;
        } else {
            cleaned.push(ch);
            in_sep = false;
        }
    }
    let rest = cleaned.trim_start();
    let no_prefix = match rest.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => rest,
        Some(i) => &rest[i..],
        None => "",
    };
    no_prefix.trim().to_uppercase()
}

/// Leading digit run of the base name, or [`OTHERS_GROUP`].
pub fn extract_group(filename: &str) -> String {
    let base = base_name(filename);
    let end = base
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(base.len());
    if end == 0 {
        OTHERS_GROUP.to_string()
    } else {
        base[..end].to_string()
    }
}

/// Upper-cased stem split on anything that isn't a letter or digit.
fn stem_tokens(filename: &str) -> Vec<String> {
    stem(filename)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// A precomposed render: `FINAL` as a whole token of the stem, optionally
/// followed by a variant (`FINAL_NOITE`). `FINALIZACAO` and `Semifinal` are
/// ordinary lights.
pub fn is_final(filename: &str) -> bool {
    stem_tokens(filename).iter().any(|t| t == "FINAL")
}

/// The default precomposed render: the stem's last token is `FINAL`.
pub fn is_primary_final(filename: &str) -> bool {
    stem_tokens(filename).last().is_some_and(|t| t == "FINAL")
}

/// The layer shown at full opacity in final mode: first primary FINAL in
/// `layers`, else the first FINAL of any kind.
pub fn primary_final<S: AsRef<str>>(layers: &[S]) -> Option<&str> {
    layers
        .iter()
        .map(AsRef::as_ref)
        .find(|f| is_primary_final(f))
        .or_else(|| layers.iter().map(AsRef::as_ref).find(|f| is_final(f)))
}

/// FINAL files other than the primary one; the candidates for swap cycles.
pub fn final_variants<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    let primary = primary_final(files);
    files
        .iter()
        .map(AsRef::as_ref)
        .filter(|f| is_final(f) && Some(*f) != primary)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive comparison with a byte-order tie-break.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Canonical list order: FINAL files first, then [`locale_cmp`].
pub fn sort_lights<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    let mut out: Vec<String> = files.iter().map(|f| f.as_ref().to_string()).collect();
    out.sort_by(|a, b| match (is_final(a), is_final(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => locale_cmp(a, b),
    });
    out
}

fn group_order(a: &str, b: &str) -> Ordering {
    match (a == OTHERS_GROUP, b == OTHERS_GROUP) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let at = a.trim_start_matches('0');
            let bt = b.trim_start_matches('0');
            at.len()
                .cmp(&bt.len())
                .then_with(|| at.cmp(bt))
                .then_with(|| a.cmp(b))
        }
    }
}

/// Groups by leading number; groups ordered numerically with `OUTROS` last.
pub fn group_by_number<S: AsRef<str>>(files: &[S]) -> Vec<LightGroup> {
    let mut groups: Vec<LightGroup> = Vec::new();
    for f in files.iter().map(AsRef::as_ref) {
        let key = extract_group(f);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(g) => g.files.push(f.to_string()),
            None => groups.push(LightGroup {
                key,
                files: vec![f.to_string()],
            }),
        }
    }
    groups.sort_by(|a, b| group_order(&a.key, &b.key));
    groups
}

/// Default daylight-controlled files for a fresh environment.
pub fn suggest_daylight_targets<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    files
        .iter()
        .map(AsRef::as_ref)
        .filter(|f| !is_final(f))
        .filter(|f| {
            let label = sanitize_label(f);
            base_name(f).starts_with("0 -") || label.contains("DOME") || label.contains("CORTINA")
        })
        .map(str::to_string)
        .collect()
}
