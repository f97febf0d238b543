//! Synthetic artifact and payload builders for testing.

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, Luma};
use safetensors::tensor::TensorView;
use safetensors::{serialize, Dtype};
use std::collections::HashMap;
use std::path::Path;

use medpredict_core::encode::FEATURE_LEN;

/// Creates a gradient grayscale image resembling a radiograph scan.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn xray_image(width: u32, height: u32) -> DynamicImage {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let val = ((x * 255 / width.max(1)) + (y * 64 / height.max(1))).min(255) as u8;
        Luma([val])
    });
    DynamicImage::ImageLuma8(img)
}

/// Encodes a synthetic X-ray image as PNG bytes, ready for upload.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn xray_png_bytes(width: u32, height: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    xray_image(width, height)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .context("Failed to encode synthetic X-ray as PNG")?;
    Ok(bytes)
}

/// Renders a severity CSV with the given (symptom, weight) rows.
#[must_use]
pub fn severity_csv(entries: &[(&str, u32)]) -> String {
    let mut csv = String::from("Symptom,weight\n");
    for (symptom, weight) in entries {
        csv.push_str(&format!("{symptom},{weight}\n"));
    }
    csv
}

/// Builds a linear one-vs-rest SVM model JSON where class `i` responds to
/// feature `i` alone.
///
/// Prediction over such a model is the label whose feature index holds the
/// largest value, with earlier classes winning ties.
#[must_use]
pub fn svm_one_hot_json(labels: &[&str]) -> String {
    let classes: Vec<serde_json::Value> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut weights = vec![0.0; FEATURE_LEN];
            weights[i] = 1.0;
            serde_json::json!({
                "label": label,
                "weights": weights,
                "rho": 0.0,
            })
        })
        .collect();

    serde_json::json!({
        "kernel": "linear",
        "feature_len": FEATURE_LEN,
        "linear": classes,
    })
    .to_string()
}

/// Writes the chest service's model artifacts into a directory.
///
/// The CNN weights are all zero except the head bias, so the classifier's
/// output is exactly `softmax(head_biases)` for every input. Two biases of
/// `[0.0, 2.0]` therefore predict PNEUMONIA at ~88.08% on any image.
///
/// # Errors
///
/// Returns an error if serialization or file writing fails.
pub fn write_chest_fixtures(dir: &Path, labels: &[&str], head_biases: &[f32]) -> Result<()> {
    assert_eq!(
        labels.len(),
        head_biases.len(),
        "one head bias per class label"
    );

    std::fs::write(
        dir.join(medpredict_adapters::chest::LABELS_FILE),
        serde_json::to_string(labels).context("Failed to serialize labels")?,
    )
    .context("Failed to write labels fixture")?;

    let weights = chest_weights_bytes(labels.len(), head_biases)?;
    std::fs::write(dir.join(medpredict_adapters::chest::WEIGHTS_FILE), weights)
        .context("Failed to write weights fixture")?;

    Ok(())
}

/// Writes the symptom service's model artifacts into a directory.
///
/// # Errors
///
/// Returns an error if file writing fails.
pub fn write_symptom_fixtures(
    dir: &Path,
    severity: &[(&str, u32)],
    svm_labels: &[&str],
) -> Result<()> {
    std::fs::write(
        dir.join(medpredict_adapters::disease::SEVERITY_FILE),
        severity_csv(severity),
    )
    .context("Failed to write severity fixture")?;

    std::fs::write(
        dir.join(medpredict_adapters::disease::SVM_FILE),
        svm_one_hot_json(svm_labels),
    )
    .context("Failed to write SVM fixture")?;

    Ok(())
}

/// Serializes zeroed classifier weights with the given head biases.
fn chest_weights_bytes(num_classes: usize, head_biases: &[f32]) -> Result<Vec<u8>> {
    // Shapes must match ChestXrayClassifier's architecture.
    let tensors: Vec<(&str, Vec<usize>, Vec<f32>)> = vec![
        ("conv1.weight", vec![16, 3, 3, 3], vec![0.0; 16 * 3 * 3 * 3]),
        ("conv1.bias", vec![16], vec![0.0; 16]),
        ("conv2.weight", vec![32, 16, 3, 3], vec![0.0; 32 * 16 * 3 * 3]),
        ("conv2.bias", vec![32], vec![0.0; 32]),
        ("conv3.weight", vec![64, 32, 3, 3], vec![0.0; 64 * 32 * 3 * 3]),
        ("conv3.bias", vec![64], vec![0.0; 64]),
        (
            "head.weight",
            vec![num_classes, 64],
            vec![0.0; num_classes * 64],
        ),
        ("head.bias", vec![num_classes], head_biases.to_vec()),
    ];

    let mut views: HashMap<String, TensorView<'_>> = HashMap::new();
    for (name, shape, data) in &tensors {
        let view = TensorView::new(Dtype::F32, shape.clone(), bytemuck::cast_slice(data))
            .with_context(|| format!("Invalid tensor view for '{name}'"))?;
        views.insert((*name).to_string(), view);
    }

    serialize(&views, &None).context("Failed to serialize weights fixture")
}
