//! Fixed-canvas image normalization.
//!
//! Every catalog image is scaled to fit a 595x842 frame without cropping,
//! centred, letterboxed with opaque white and re-encoded as JPEG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{
    codecs::jpeg::JpegEncoder,
    imageops::{self, FilterType},
    DynamicImage, ImageReader, Rgba, RgbImage, RgbaImage,
};
use tracing::debug;

pub const CANVAS_WIDTH: u32 = 595;
pub const CANVAS_HEIGHT: u32 = 842;
pub const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const JPEG_QUALITY: u8 = 90;

/// Where a scaled source lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Uniform scale-to-fit of a `src_w` x `src_h` image into the canvas.
///
/// The limiting axis always spans the full canvas, so fill bands appear on
/// at most one axis.
pub fn fit_within(src_w: u32, src_h: u32) -> Placement {
    let sx = CANVAS_WIDTH as f64 / src_w as f64;
    let sy = CANVAS_HEIGHT as f64 / src_h as f64;
    let (width, height) = if sx <= sy {
        (CANVAS_WIDTH, scale_extent(src_h, sx, CANVAS_HEIGHT))
    } else {
        (scale_extent(src_w, sy, CANVAS_WIDTH), CANVAS_HEIGHT)
    };
    Placement {
        width,
        height,
        x: (CANVAS_WIDTH - width) / 2,
        y: (CANVAS_HEIGHT - height) / 2,
    }
}

fn scale_extent(extent: u32, scale: f64, max: u32) -> u32 {
    ((extent as f64 * scale).round() as u32).clamp(1, max)
}

/// Composes `src` onto a white canvas. Transparent source pixels blend into the fill.
pub fn compose(src: &DynamicImage) -> anyhow::Result<RgbImage> {
    let (w, h) = (src.width(), src.height());
    anyhow::ensure!(w > 0 && h > 0, "source image has no pixels");

    let p = fit_within(w, h);
    let rgba = src.to_rgba8();
    let scaled = if (p.width, p.height) == (w, h) {
        rgba
    } else {
        imageops::resize(&rgba, p.width, p.height, FilterType::Lanczos3)
    };

    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, FILL);
    imageops::overlay(&mut canvas, &scaled, p.x as i64, p.y as i64);
    Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Path of the normalized rendition: the extension is replaced by `_a4.jpg`.
pub fn normalized_path(raw: &Path) -> PathBuf {
    let stem = raw
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    raw.with_file_name(format!("{stem}_a4.jpg"))
}

/// Decodes `input`, composes it onto the canvas and writes a quality-90 JPEG to `output`.
///
/// `output` only appears once it is complete; on error nothing is left behind.
/// The source file is never touched.
pub fn normalize_to_canvas(input: &Path, output: &Path) -> anyhow::Result<()> {
    let src = ImageReader::open(input)
        .with_context(|| format!("open {}", input.display()))?
        .with_guessed_format()
        .with_context(|| format!("sniff format of {}", input.display()))?
        .decode()
        .with_context(|| format!("decode {}", input.display()))?;

    let canvas = compose(&src)?;

    let partial = output.with_extension("part");
    let written = write_jpeg(&canvas, &partial).and_then(|_| {
        std::fs::rename(&partial, output)
            .with_context(|| format!("rename into {}", output.display()))
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    written?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        src_w = src.width(),
        src_h = src.height(),
        "image normalized"
    );
    Ok(())
}

fn write_jpeg(img: &RgbImage, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .context("encode jpeg")?;
    out.flush().context("flush jpeg")?;
    Ok(())
}

/// Runs [`normalize_to_canvas`] on the blocking pool.
pub async fn normalize_blocking(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || normalize_to_canvas(&input, &output))
        .await
        .context("canvas worker panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb};

    const RED: Rgb<u8> = Rgb([200, 20, 20]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, RED))
    }

    fn near(a: Rgb<u8>, b: Rgb<u8>, tol: u8) -> bool {
        a.0.iter().zip(b.0.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
    }

    fn assert_only_fill_outside(img: &RgbImage, p: Placement) {
        for (x, y, px) in img.enumerate_pixels() {
            let inside = x >= p.x && x < p.x + p.width && y >= p.y && y < p.y + p.height;
            if !inside {
                assert_eq!(*px, WHITE, "pixel ({x},{y}) outside placement is not fill");
            }
        }
    }

    #[test]
    fn fit_keeps_one_axis_exact_and_centres_the_other() {
        for (w, h) in [(1190, 400), (200, 400), (595, 842), (10, 10), (4000, 3000), (1, 5000)] {
            let p = fit_within(w, h);
            assert!(
                p.width == CANVAS_WIDTH || p.height == CANVAS_HEIGHT,
                "{w}x{h} fills neither axis: {p:?}"
            );
            assert!(p.x == 0 || p.y == 0, "{w}x{h} has bands on both axes: {p:?}");
            assert_eq!(p.x, (CANVAS_WIDTH - p.width) / 2);
            assert_eq!(p.y, (CANVAS_HEIGHT - p.height) / 2);
        }
    }

    #[test]
    fn wide_source_gets_horizontal_bands() {
        let p = fit_within(1190, 400);
        assert_eq!(p, Placement { width: 595, height: 200, x: 0, y: 321 });

        let out = compose(&solid(1190, 400)).unwrap();
        assert_eq!(out.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_only_fill_outside(&out, p);
        assert!(near(*out.get_pixel(297, 421), RED, 2));
        assert_eq!(*out.get_pixel(297, 320), WHITE);
        assert_eq!(*out.get_pixel(297, 521), WHITE);
    }

    #[test]
    fn tall_source_gets_vertical_bands() {
        let p = fit_within(200, 400);
        assert_eq!(p, Placement { width: 421, height: 842, x: 87, y: 0 });

        let out = compose(&solid(200, 400)).unwrap();
        assert_only_fill_outside(&out, p);
        assert_eq!(*out.get_pixel(86, 400), WHITE);
        assert!(near(*out.get_pixel(300, 400), RED, 2));
        assert_eq!(*out.get_pixel(508, 400), WHITE);
    }

    #[test]
    fn exact_canvas_source_is_not_rescaled() {
        let p = fit_within(CANVAS_WIDTH, CANVAS_HEIGHT);
        assert_eq!(p, Placement { width: 595, height: 842, x: 0, y: 0 });
        let out = compose(&solid(CANVAS_WIDTH, CANVAS_HEIGHT)).unwrap();
        assert!(out.pixels().all(|px| *px == RED));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let clear = RgbaImage::from_pixel(595, 842, Rgba([0, 0, 0, 0]));
        let out = compose(&DynamicImage::ImageRgba8(clear)).unwrap();
        assert!(out.pixels().all(|px| *px == WHITE));
    }

    #[test]
    fn normalized_path_swaps_extension() {
        assert_eq!(
            normalized_path(Path::new("uploads/thumbnail-1-2.png")),
            PathBuf::from("uploads/thumbnail-1-2_a4.jpg")
        );
        assert_eq!(
            normalized_path(Path::new("uploads/photo-1-2.JPEG")),
            PathBuf::from("uploads/photo-1-2_a4.jpg")
        );
    }

    #[test]
    fn writes_canvas_sized_jpeg_and_leaves_source_alone() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("thumbnail-1-1.png");
        solid(300, 100).save(&src).unwrap();
        let before = std::fs::read(&src).unwrap();

        let out = normalized_path(&src);
        normalize_to_canvas(&src, &out).unwrap();

        assert_eq!(std::fs::read(&src).unwrap(), before);
        let decoded = image::open(&out).unwrap();
        assert_eq!(decoded.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(
            image::ImageFormat::from_path(&out).unwrap(),
            image::ImageFormat::Jpeg
        );
        assert!(!out.with_extension("part").exists());
    }

    #[test]
    fn renormalizing_a_canvas_keeps_dimensions_and_fill() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("photo-1-1.png");
        solid(1190, 400).save(&src).unwrap();

        let first = dir.path().join("first.jpg");
        let second = dir.path().join("second.jpg");
        normalize_to_canvas(&src, &first).unwrap();
        normalize_to_canvas(&first, &second).unwrap();

        let img = image::open(&second).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert!(near(*img.get_pixel(10, 10), WHITE, 3));
        assert!(near(*img.get_pixel(10, 830), WHITE, 3));
        assert!(near(*img.get_pixel(297, 421), RED, 12));
    }

    #[test]
    fn corrupt_source_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("thumbnail-1-1.png");
        std::fs::write(&src, b"definitely not a png").unwrap();
        let out = normalized_path(&src);

        assert!(normalize_to_canvas(&src, &out).is_err());
        assert!(!out.exists());
        assert!(!out.with_extension("part").exists());
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("thumbnail-1-1.png");
        solid(20, 20).save(&src).unwrap();
        let out = dir.path().join("missing-dir").join("x_a4.jpg");
        assert!(normalize_to_canvas(&src, &out).is_err());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn blocking_wrapper_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("thumbnail-9-9.gif");
        solid(40, 80).save_with_format(&src, image::ImageFormat::Gif).unwrap();
        let out = normalized_path(&src);
        normalize_blocking(src.clone(), out.clone()).await.unwrap();
        assert!(out.exists());
    }
}
