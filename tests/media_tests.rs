// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for media acquisition

use std::sync::Arc;
use std::time::Instant;

use framebooth::backends::camera::types::CameraFrame;
use framebooth::compose::compose_blocking;
use framebooth::media::{decode_photo_blocking, photo_from_frame};
use image::{Rgba, RgbaImage};

/// An asymmetric scene: left half red, right half blue
fn scene(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let color = if x < width / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
            img.put_pixel(x, y, color);
        }
    }
    img
}

fn frame_from(image: &RgbaImage) -> CameraFrame {
    CameraFrame {
        width: image.width(),
        height: image.height(),
        data: Arc::from(image.as_raw().clone().into_boxed_slice()),
        captured_at: Instant::now(),
    }
}

#[test]
fn front_and_rear_captures_of_the_same_scene_agree() {
    // The rear sensor sees the scene as-is; the front sensor sees its
    // mirror image. With the front correction applied exactly once, both
    // captures must come out in the same orientation.
    let scene = scene(640, 480);
    let front_sensor = image::imageops::flip_horizontal(&scene);

    let rear = photo_from_frame(&frame_from(&scene), false).unwrap();
    let front = photo_from_frame(&frame_from(&front_sensor), true).unwrap();

    assert_eq!(rear.image.as_raw(), front.image.as_raw());

    let overlay = RgbaImage::from_pixel(360, 640, Rgba([0, 0, 0, 0]));
    let rear_artifact = compose_blocking(&rear, &overlay, 360, 640).unwrap();
    let front_artifact = compose_blocking(&front, &overlay, 360, 640).unwrap();
    assert_eq!(rear_artifact.png_bytes(), front_artifact.png_bytes());
}

#[test]
fn rear_captures_are_never_mirrored() {
    let scene = scene(64, 32);
    let photo = photo_from_frame(&frame_from(&scene), false).unwrap();
    // left edge still red
    assert_eq!(photo.image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
}

#[test]
fn decoding_accepts_common_raster_formats() {
    let img = scene(32, 32);
    for format in [image::ImageFormat::Png, image::ImageFormat::Jpeg] {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut bytes), format)
            .unwrap();
        let photo = decode_photo_blocking(&bytes).expect("decodes");
        assert_eq!((photo.width(), photo.height()), (32, 32));
    }
}

#[test]
fn decode_failure_is_recoverable_not_a_panic() {
    let result = decode_photo_blocking(&[0xde, 0xad, 0xbe, 0xef]);
    assert!(result.is_err());
}
