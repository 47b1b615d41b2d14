// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Decode + normalize through the public `normalize` entry point

use crate::common::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use visual_embed_service::vision::{normalize, ImageError, CHANNELS, INPUT_SIZE};

const EXPECTED_SHAPE: [usize; 4] = [1, 224, 224, 3];

#[test]
fn test_shape_is_fixed_for_any_input_size() {
    for (w, h) in [(1, 1), (224, 224), (640, 480), (37, 900)] {
        let tensor = normalize(&gradient_png_base64(w, h)).unwrap();
        assert_eq!(tensor.shape(), &EXPECTED_SHAPE, "input {}x{}", w, h);
    }
    assert_eq!(INPUT_SIZE, 224);
    assert_eq!(CHANNELS, 3);
}

#[test]
fn test_values_in_unit_range() {
    let tensor = normalize(&jpeg_base64(300, 200)).unwrap();
    assert!(tensor
        .as_array()
        .iter()
        .all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_black_and_white_map_to_range_ends() {
    let black = normalize(&solid_png_base64(10, 10, [0, 0, 0])).unwrap();
    let white = normalize(&solid_png_base64(10, 10, [255, 255, 255])).unwrap();

    assert!(black.as_array().iter().all(|v| *v == -1.0));
    assert!(white.as_array().iter().all(|v| *v == 1.0));
}

#[test]
fn test_channel_order_is_rgb() {
    let tensor = normalize(&solid_png_base64(5, 5, [255, 0, 0])).unwrap();
    let array = tensor.as_array();

    assert_eq!(array[[0, 100, 100, 0]], 1.0);
    assert_eq!(array[[0, 100, 100, 1]], -1.0);
    assert_eq!(array[[0, 100, 100, 2]], -1.0);
}

#[test]
fn test_grayscale_replicated_across_channels() {
    let tensor = normalize(&gray_png_base64(12, 12, 51)).unwrap();
    let array = tensor.as_array();

    let r = array[[0, 50, 50, 0]];
    assert_eq!(array[[0, 50, 50, 1]], r);
    assert_eq!(array[[0, 50, 50, 2]], r);
}

#[test]
fn test_alpha_channel_dropped() {
    let tensor = normalize(&rgba_png_base64(9, 9)).unwrap();
    assert_eq!(tensor.shape(), &EXPECTED_SHAPE);
}

#[test]
fn test_data_uri_and_bare_payload_agree() {
    let bare = gradient_png_base64(48, 48);
    let prefixed = format!("data:image/png;base64,{}", bare);

    assert_eq!(normalize(&bare).unwrap(), normalize(&prefixed).unwrap());
}

#[test]
fn test_line_wrapped_payload_accepted() {
    let bare = gradient_png_base64(20, 20);
    let wrapped: String = bare
        .as_bytes()
        .chunks(76)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(normalize(&bare).unwrap(), normalize(&wrapped).unwrap());
}

#[test]
fn test_repeated_calls_are_identical() {
    let encoded = jpeg_base64(128, 96);
    assert_eq!(normalize(&encoded).unwrap(), normalize(&encoded).unwrap());
}

#[test]
fn test_invalid_base64_is_decode_error() {
    let err = normalize("not-base64!!").unwrap_err();
    assert!(matches!(err, ImageError::Decode(_)));
}

#[test]
fn test_text_bytes_are_format_error() {
    let err = normalize(&STANDARD.encode("hello, world")).unwrap_err();
    assert!(matches!(err, ImageError::Format(_)));
}

#[test]
fn test_empty_payload_is_format_error() {
    let err = normalize("").unwrap_err();
    assert!(matches!(err, ImageError::Format(_)));
}
