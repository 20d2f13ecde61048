use std::io::Cursor;
use std::path::{Path, PathBuf};

use titlecard::{BatchJob, FontSpec, Theme, Tier, TitlerError, process_batch};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "titlecard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn have_font() -> bool {
    FontSpec::default().load_bytes().is_ok()
}

fn write_png(path: &Path, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(64, 48, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

fn job(input_dir: PathBuf, output_dir: PathBuf) -> BatchJob {
    BatchJob {
        input_dir,
        output_dir,
        tier: Tier::None,
        logo_path: None,
        font: FontSpec::default(),
        separator: '-',
        theme: Theme::default(),
    }
}

#[test]
fn batch_attempts_every_file_and_tallies_failures() {
    if !have_font() {
        eprintln!("no system font found, skipping");
        return;
    }
    let input = temp_dir("batch_tally_in");
    let output = temp_dir("batch_tally_out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::create_dir_all(&output).unwrap();

    write_png(&input.join("hello-world.png"), [10, 20, 30, 255]);
    write_png(&input.join("lorem-ipsum-dolor.png"), [90, 10, 10, 255]);
    std::fs::write(input.join("notes.txt"), b"not an image").unwrap();

    let report = process_batch(&job(input.clone(), output.clone())).unwrap();
    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);

    assert!(output.join("hello-world-featured-image.png").exists());
    assert!(output.join("lorem-ipsum-dolor-featured-image.png").exists());

    std::fs::remove_dir_all(&input).unwrap();
    std::fs::remove_dir_all(&output).unwrap();
}

#[test]
fn unsplittable_file_names_count_as_failures() {
    if !have_font() {
        eprintln!("no system font found, skipping");
        return;
    }
    let input = temp_dir("batch_unsplittable_in");
    let output = temp_dir("batch_unsplittable_out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::create_dir_all(&output).unwrap();

    write_png(&input.join("minimalism.png"), [10, 20, 30, 255]);

    let report = process_batch(&job(input.clone(), output.clone())).unwrap();
    assert_eq!(report.succeeded.len(), 0);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        report.failed[0].1,
        TitlerError::UnsplittableTitle(_)
    ));

    std::fs::remove_dir_all(&input).unwrap();
    std::fs::remove_dir_all(&output).unwrap();
}

#[test]
fn enumeration_is_not_recursive() {
    if !have_font() {
        eprintln!("no system font found, skipping");
        return;
    }
    let input = temp_dir("batch_flat_in");
    let output = temp_dir("batch_flat_out");
    std::fs::create_dir_all(input.join("nested")).unwrap();
    std::fs::create_dir_all(&output).unwrap();

    write_png(&input.join("hello-world.png"), [10, 20, 30, 255]);
    write_png(&input.join("nested").join("deep-cut.png"), [10, 20, 30, 255]);

    let report = process_batch(&job(input.clone(), output.clone())).unwrap();
    assert_eq!(report.attempted(), 1);
    assert_eq!(report.succeeded.len(), 1);
    assert!(!output.join("deep-cut-featured-image.png").exists());

    std::fs::remove_dir_all(&input).unwrap();
    std::fs::remove_dir_all(&output).unwrap();
}
