//! Integration tests for raster image loading.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use omr_adapters::{load_image, FsImageSource};
use omr_core::{ImageDimensions, ImageInfo, ImageSource};

/// Writes an 8x6 image in each supported container format.
fn write_fixtures(dir: &Path) {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, image::Rgb([200, 10, 10])));
    for (name, format) in [
        ("sheet.png", ImageFormat::Png),
        ("sheet.jpg", ImageFormat::Jpeg),
        ("sheet.tiff", ImageFormat::Tiff),
        ("sheet.bmp", ImageFormat::Bmp),
    ] {
        img.save_with_format(dir.join(name), format).unwrap();
    }
}

#[test]
fn test_load_each_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_fixtures(temp_dir.path());

    for name in ["sheet.png", "sheet.jpg", "sheet.tiff", "sheet.bmp"] {
        let info = load_image(&temp_dir.path().join(name))
            .unwrap_or_else(|e| panic!("should load {name}: {e:#}"));
        assert_eq!(info.dimensions(), ImageDimensions::new(8, 6));
        assert!(info.path.ends_with(name));
    }
}

#[test]
fn test_load_directory_sorted() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_fixtures(temp_dir.path());
    std::fs::write(temp_dir.path().join("exam.json"), "{}").unwrap();

    let source = FsImageSource::new(vec![temp_dir.path().to_path_buf()], false);
    let images: Vec<ImageInfo> = source
        .images()
        .map(|r| r.expect("all fixtures should load"))
        .collect();

    assert_eq!(images.len(), 4);
    let names: Vec<_> = images
        .iter()
        .map(|i| Path::new(&i.path).file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_count_hint() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_fixtures(temp_dir.path());

    let source = FsImageSource::new(vec![temp_dir.path().to_path_buf()], false);
    assert_eq!(source.count_hint(), Some(4));
}

#[test]
fn test_recursion_is_opt_in() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested = temp_dir.path().join("period-1");
    std::fs::create_dir(&nested).unwrap();
    write_fixtures(&nested);

    let flat = FsImageSource::new(vec![temp_dir.path().to_path_buf()], false);
    let deep = FsImageSource::new(vec![temp_dir.path().to_path_buf()], true);
    assert_eq!(flat.count_hint(), Some(0));
    assert_eq!(deep.count_hint(), Some(4));
}

#[test]
fn test_corrupt_file_yields_error_item() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let source = FsImageSource::new(vec![path], false);
    let items: Vec<_> = source.images().collect();
    assert_eq!(items.len(), 1);
    let err = items.into_iter().next().unwrap().unwrap_err();
    assert!(format!("{err:#}").contains("broken.png"));
}
