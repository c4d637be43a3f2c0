use std::collections::HashMap;

use super::*;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<SitemapConfig, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    SitemapConfig::from_lookup(&|key: &str| vars.get(key).cloned())
}

#[test]
fn unset_variables_use_defaults() {
    let cfg = from_pairs(&[]).unwrap();
    assert_eq!(cfg, SitemapConfig::default());
    assert!((cfg.spacing.horizontal - 250.0).abs() < f64::EPSILON);
    assert!((cfg.spacing.vertical - 200.0).abs() < f64::EPSILON);
    assert_eq!(cfg.frames_per_row, 5);
    assert!((cfg.default_frame_width - DEFAULT_FRAME_WIDTH).abs() < f64::EPSILON);
}

#[test]
fn overrides_are_parsed_and_trimmed() {
    let cfg = from_pairs(&[
        ("SITEMAP_H_SPACING", "300"),
        ("SITEMAP_V_SPACING", " 150 "),
        ("SITEMAP_FRAMES_PER_ROW", "4"),
        ("SITEMAP_CONTAINER_PADDING", "0"),
        ("SITEMAP_DEFAULT_FRAME_WIDTH", "375"),
    ])
    .unwrap();
    assert!((cfg.spacing.horizontal - 300.0).abs() < f64::EPSILON);
    assert!((cfg.spacing.vertical - 150.0).abs() < f64::EPSILON);
    assert_eq!(cfg.frames_per_row, 4);
    assert!(cfg.container_padding.abs() < f64::EPSILON);
    assert!((cfg.default_frame_width - 375.0).abs() < f64::EPSILON);
}

#[test]
fn garbage_names_the_variable() {
    let err = from_pairs(&[("SITEMAP_H_SPACING", "wide")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "SITEMAP_H_SPACING", .. }));
    assert!(err.to_string().contains("wide"));
}

#[test]
fn zero_row_capacity_is_rejected() {
    assert!(matches!(
        from_pairs(&[("SITEMAP_FRAMES_PER_ROW", "0")]),
        Err(ConfigError::NotPositive { key: "SITEMAP_FRAMES_PER_ROW" })
    ));
}

#[test]
fn non_positive_spacing_and_size_are_rejected() {
    for (key, value) in [
        ("SITEMAP_V_SPACING", "-10"),
        ("SITEMAP_H_SPACING", "0"),
        ("SITEMAP_DEFAULT_FRAME_HEIGHT", "NaN"),
    ] {
        let err = from_pairs(&[(key, value)]).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { key: k } if k == key), "{key}={value}");
    }
}

#[test]
fn bad_frame_gap_and_padding_are_rejected() {
    for (key, value) in [
        ("SITEMAP_FRAME_SPACING", "NaN"),
        ("SITEMAP_FRAME_SPACING", "inf"),
        ("SITEMAP_CONTAINER_PADDING", "-500"),
    ] {
        let err = from_pairs(&[(key, value)]).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { key: k } if k == key), "{key}={value}");
    }
    let cfg = from_pairs(&[("SITEMAP_FRAME_SPACING", "0")]).unwrap();
    assert!(cfg.frame_spacing.abs() < f64::EPSILON);
}

#[test]
fn env_var_reads_process_environment() {
    let key = "__TEST_SITEMAP_ENV_VAR_7731__";
    unsafe { std::env::set_var(key, "42") };
    assert_eq!(env_var(key).as_deref(), Some("42"));
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_var(key), None);
}

#[test]
fn grid_spec_fills_missing_frame_size() {
    let cfg = SitemapConfig::default();
    let spec = cfg.grid_spec(Some(300.0), None);
    assert!((spec.frame_width - 300.0).abs() < f64::EPSILON);
    assert!((spec.frame_height - DEFAULT_FRAME_HEIGHT).abs() < f64::EPSILON);
    assert_eq!(spec.per_row, cfg.frames_per_row);
    assert!((spec.padding - cfg.container_padding).abs() < f64::EPSILON);
}
