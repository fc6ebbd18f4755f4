// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the compositor

use framebooth::compose::{compose_blocking, cover_fit};
use framebooth::media::RawPhoto;
use image::{Rgba, RgbaImage};

fn photo(width: u32, height: u32, color: [u8; 4]) -> RawPhoto {
    RawPhoto {
        image: RgbaImage::from_pixel(width, height, Rgba(color)),
    }
}

fn transparent_overlay() -> RgbaImage {
    RgbaImage::from_pixel(360, 640, Rgba([0, 0, 0, 0]))
}

fn decode(artifact: &framebooth::CompositeArtifact) -> RgbaImage {
    image::load_from_memory(artifact.png_bytes())
        .expect("artifact PNG decodes")
        .to_rgba8()
}

#[test]
fn artifact_dimensions_match_the_output_size_for_any_aspect_ratio() {
    let overlay = transparent_overlay();
    for (w, h) in [(1920, 1080), (1080, 1920), (500, 500), (360, 640), (17, 93)] {
        let artifact = compose_blocking(&photo(w, h, [200, 10, 10, 255]), &overlay, 360, 640)
            .expect("compose succeeds");
        assert_eq!(artifact.width(), 360);
        assert_eq!(artifact.height(), 640);

        let decoded = decode(&artifact);
        assert_eq!(
            decoded.dimensions(),
            (360, 640),
            "encoded dimensions for {}x{} input",
            w,
            h
        );
    }
}

#[test]
fn cover_fit_never_letterboxes() {
    // For any input aspect ratio the scaled photo must fully cover the
    // canvas: with an opaque photo and a fully transparent overlay there
    // must be no transparent pixel anywhere.
    let overlay = transparent_overlay();
    for (w, h) in [(1920, 1080), (640, 360), (100, 1000), (359, 641)] {
        let artifact = compose_blocking(&photo(w, h, [0, 120, 240, 255]), &overlay, 360, 640)
            .expect("compose succeeds");
        let decoded = decode(&artifact);
        for (x, y) in [
            (0, 0),
            (359, 0),
            (0, 639),
            (359, 639),
            (180, 320),
            (0, 320),
            (359, 320),
            (180, 0),
            (180, 639),
        ] {
            assert_eq!(
                decoded.get_pixel(x, y)[3],
                255,
                "uncovered pixel at ({}, {}) for {}x{} input",
                x,
                y,
                w,
                h
            );
        }
    }
}

#[test]
fn scale_is_the_max_ratio_exactly() {
    let fit = cover_fit(1920, 1080, 360, 640);
    let expected = f64::max(360.0 / 1920.0, 640.0 / 1080.0);
    assert!((fit.scale - expected).abs() < 1e-12);

    let fit = cover_fit(1080, 1920, 360, 640);
    let expected = f64::max(360.0 / 1080.0, 640.0 / 1920.0);
    assert!((fit.scale - expected).abs() < 1e-12);
}

#[test]
fn the_overlay_is_always_drawn_on_top() {
    let photo = photo(360, 640, [255, 0, 0, 255]);
    let overlay = RgbaImage::from_pixel(360, 640, Rgba([0, 255, 0, 255]));
    let artifact = compose_blocking(&photo, &overlay, 360, 640).unwrap();
    let decoded = decode(&artifact);
    assert_eq!(decoded.get_pixel(180, 320), &Rgba([0, 255, 0, 255]));
}

#[test]
fn the_photo_shows_through_the_overlay_cutout() {
    // Overlay opaque on the left half, transparent on the right
    let mut overlay = RgbaImage::from_pixel(360, 640, Rgba([0, 0, 0, 0]));
    for y in 0..640 {
        for x in 0..180 {
            overlay.put_pixel(x, y, Rgba([10, 10, 10, 255]));
        }
    }
    let artifact = compose_blocking(&photo(360, 640, [250, 200, 0, 255]), &overlay, 360, 640).unwrap();
    let decoded = decode(&artifact);
    assert_eq!(decoded.get_pixel(90, 320), &Rgba([10, 10, 10, 255]));
    assert_eq!(decoded.get_pixel(270, 320), &Rgba([250, 200, 0, 255]));
}

#[test]
fn an_undersized_overlay_is_stretched_to_the_output_size() {
    let small_overlay = RgbaImage::from_pixel(36, 64, Rgba([5, 5, 5, 255]));
    let artifact = compose_blocking(&photo(360, 640, [255, 0, 0, 255]), &small_overlay, 360, 640)
        .unwrap();
    let decoded = decode(&artifact);
    // Stretched opaque overlay covers everything, photo color never shows
    assert_eq!(decoded.get_pixel(0, 0), &Rgba([5, 5, 5, 255]));
    assert_eq!(decoded.get_pixel(359, 639), &Rgba([5, 5, 5, 255]));
}

#[test]
fn data_uri_round_trips_through_base64() {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    let artifact =
        compose_blocking(&photo(360, 640, [1, 2, 3, 255]), &transparent_overlay(), 360, 640)
            .unwrap();
    let uri = artifact.to_data_uri();
    let encoded = uri
        .strip_prefix("data:image/png;base64,")
        .expect("data URI prefix");
    let bytes = STANDARD.decode(encoded).expect("valid base64");
    assert_eq!(bytes, artifact.png_bytes());
}
