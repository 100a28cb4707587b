//! Integration tests for the size-budget compressor's public contract

use foldtex::{CompressorConfig, SizeBudgetCompressor, SourceImage};

fn noisy_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(97).wrapping_add(y.wrapping_mul(13)) % 253) as u8;
        image::Rgba([v, v.wrapping_mul(2), 255 - v, 255])
    });
    let mut out = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut out),
        image::ImageFormat::Png,
    )
    .expect("Failed to encode test image");
    out
}

#[test]
fn test_within_budget_is_byte_identical() {
    let bytes = noisy_png(32, 32);
    let compressor = SizeBudgetCompressor::new(CompressorConfig {
        budget_bytes: bytes.len(),
        ..CompressorConfig::default()
    });

    let result = compressor.compress(SourceImage::new("s.png", "image/png", bytes.clone()));
    assert_eq!(result.bytes, bytes);
}

#[test]
fn test_never_grows_whatever_the_budget() {
    for divisor in [2usize, 4, 16, 64] {
        let bytes = noisy_png(200, 150);
        let input_size = bytes.len();
        let compressor = SizeBudgetCompressor::new(CompressorConfig {
            budget_bytes: input_size / divisor,
            max_dimension: 2048,
            min_dimension: 8,
        });

        let result = compressor.compress(SourceImage::new("n.png", "image/png", bytes));
        assert!(
            result.byte_size() <= input_size,
            "divisor {divisor}: {} > {input_size}",
            result.byte_size()
        );
    }
}

#[test]
fn test_result_still_decodes() {
    let bytes = noisy_png(128, 96);
    let budget = bytes.len() / 8;
    let compressor = SizeBudgetCompressor::new(CompressorConfig {
        budget_bytes: budget,
        max_dimension: 2048,
        min_dimension: 8,
    });

    let result = compressor.compress(SourceImage::new("d.png", "image/png", bytes));
    let img = image::load_from_memory(&result.bytes).expect("compressed output must decode");
    assert!(img.width() >= 8 && img.height() >= 8);
    assert!(img.width() <= 2048 && img.height() <= 2048);
}

#[test]
fn test_tiny_budget_floor_still_produces_output() {
    // A budget this small cannot be met; the loop must still terminate
    // with a usable encoding no smaller than the dimension floor.
    let bytes = noisy_png(64, 64);
    let compressor = SizeBudgetCompressor::new(CompressorConfig {
        budget_bytes: 10,
        max_dimension: 2048,
        min_dimension: 16,
    });

    let result = compressor.compress(SourceImage::new("t.png", "image/png", bytes));
    if result.media_type == "image/jpeg" {
        let img = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (16, 16));
    }
}
