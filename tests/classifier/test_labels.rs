// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Label table loading tests

use std::io::Write;
use std::sync::Arc;

use chili_leaf_classifier::{
    classifier::{ClassLabel, Classifier, ClassifierBackend, ClassifierError, LabelTable},
    vision::PreprocessOptions,
};
use image::{DynamicImage, Rgb, RgbImage};
use ndarray::Array4;
use tempfile::NamedTempFile;

/// Two-class model that always favours the second class
struct TwoClassBackend;

impl ClassifierBackend for TwoClassBackend {
    fn run(&self, _input: Array4<f32>) -> anyhow::Result<Vec<f32>> {
        Ok(vec![0.25, 0.75])
    }

    fn name(&self) -> String {
        "two-class".to_string()
    }
}

fn write_labels(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_custom_label_file_drives_classification() {
    let file = write_labels(
        r#"[
            {"name": "Healthy", "description": "green", "prevention": "water"},
            {"name": "Anthracnose", "description": "dark lesions", "prevention": "fungicide"}
        ]"#,
    );
    let labels = LabelTable::from_json_file(file.path()).unwrap();

    let classifier = Classifier::new(
        Arc::new(TwoClassBackend),
        labels,
        PreprocessOptions::default(),
        false,
    )
    .unwrap();

    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 12, Rgb([0, 0, 0])));
    let result = classifier.classify(&image).unwrap();

    assert_eq!(result.class_index, 1);
    assert_eq!(result.class_name, "Anthracnose");
    assert_eq!(result.description, "dark lesions");
    assert_eq!(result.prevention, "fungicide");
    assert_eq!(result.confidence, 0.75);
}

#[test]
fn test_builtin_table_rejected_for_two_class_model() {
    let err = Classifier::new(
        Arc::new(TwoClassBackend),
        LabelTable::chili_leaf(),
        PreprocessOptions::default(),
        false,
    )
    .unwrap_err();

    assert!(err.to_string().contains("label table has 5"));
}

#[test]
fn test_malformed_label_file() {
    let file = write_labels(r#"{"name": "not an array"}"#);
    let err = LabelTable::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ClassifierError::LabelsParse(_)));
}

#[test]
fn test_duplicate_names_in_file() {
    let file = write_labels(r#"[{"name": "Whitefly"}, {"name": "Whitefly"}]"#);
    let err = LabelTable::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidLabels(_)));
}

#[test]
fn test_default_table_is_chili_leaf() {
    let table = LabelTable::default();
    assert_eq!(table, LabelTable::chili_leaf());
    assert_eq!(table.get(0).map(|c| c.name.as_str()), Some("Healthy"));
    assert!(table.get(1).unwrap().description.contains("mengeriting"));
}

#[test]
fn test_inline_table_construction() {
    let table = LabelTable::new(vec![
        ClassLabel::new("Healthy", "", ""),
        ClassLabel::new("Sick", "spots", "remove leaves"),
    ])
    .unwrap();
    assert_eq!(table.names(), vec!["Healthy", "Sick"]);
}
