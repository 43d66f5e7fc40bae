use std::{
	ffi::OsStr,
	fs,
	path::Path,
};

use image::ImageFormat;
use uuid::Uuid;

/// Uploaded pictures are shrunk to fit within this square.
pub const THUMBNAIL_BOUND: u32 = 125;
/// Picture every account starts out with.
pub const DEFAULT_IMAGE: &str = "default.jpg";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
	#[error("profile pictures must be a jpg or png file")]
	UnsupportedFormat,
	#[error(transparent)]
	Image(#[from] image::ImageError),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Validates, resizes and stores an uploaded profile picture, returning
/// the generated file name to record on the account.
///
/// The upload keeps its original format. Pictures already inside the
/// thumbnail bound are stored as-is rather than scaled up.
pub fn ingest(
	bytes: &[u8],
	original_filename: &str,
	images_dir: &Path,
) -> Result<String, IngestError> {
	let Some(ext) = extension(original_filename) else {
		return Err(IngestError::UnsupportedFormat);
	};

	let format = format_for(&ext).ok_or(IngestError::UnsupportedFormat)?;
	let mut picture = image::load_from_memory_with_format(bytes, format)?;

	if picture.width() > THUMBNAIL_BOUND || picture.height() > THUMBNAIL_BOUND {
		picture = picture.thumbnail(THUMBNAIL_BOUND, THUMBNAIL_BOUND);
	}

	let filename = format!("{}.{ext}", Uuid::new_v4().simple());

	fs::create_dir_all(images_dir)?;
	picture.save_with_format(images_dir.join(&filename), format)?;

	Ok(filename)
}

/// Writes the shared placeholder picture if it is missing. Accounts point
/// at it until their first upload.
pub fn ensure_default(images_dir: &Path) -> Result<(), IngestError> {
	let path = images_dir.join(DEFAULT_IMAGE);

	if path.exists() {
		return Ok(());
	}

	fs::create_dir_all(images_dir)?;

	let placeholder = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
		THUMBNAIL_BOUND,
		THUMBNAIL_BOUND,
		image::Rgb([55, 71, 79]),
	));

	placeholder.save_with_format(path, ImageFormat::Jpeg)?;

	Ok(())
}

pub fn extension(filename: &str) -> Option<String> {
	Path::new(filename)
		.extension()
		.and_then(OsStr::to_str)
		.map(str::to_ascii_lowercase)
}

fn format_for(extension: &str) -> Option<ImageFormat> {
	match extension {
		"jpg" | "jpeg" => Some(ImageFormat::Jpeg),
		"png" => Some(ImageFormat::Png),
		_ => None,
	}
}

#[cfg(test)]
mod test {
	use std::io::Cursor;

	use image::{GenericImageView, ImageFormat, Rgb, RgbImage};

	use super::{ensure_default, extension, ingest, IngestError, DEFAULT_IMAGE};

	fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
		let picture =
			image::DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])));
		let mut bytes = Cursor::new(Vec::new());

		picture.write_to(&mut bytes, format).unwrap();
		bytes.into_inner()
	}

	#[test]
	fn test_large_uploads_are_resized() {
		let dir = tempfile::tempdir().unwrap();
		let filename = ingest(
			&encoded(500, 250, ImageFormat::Png),
			"photo.png",
			dir.path(),
		)
		.unwrap();

		assert!(filename.ends_with(".png"));

		let saved = image::open(dir.path().join(&filename)).unwrap();

		assert_eq!(saved.width(), 125);
		assert!(saved.height() <= 125);
	}

	#[test]
	fn test_small_uploads_are_not_upscaled() {
		let dir = tempfile::tempdir().unwrap();
		let filename = ingest(
			&encoded(60, 40, ImageFormat::Jpeg),
			"photo.jpg",
			dir.path(),
		)
		.unwrap();

		let saved = image::open(dir.path().join(&filename)).unwrap();

		assert_eq!(saved.dimensions(), (60, 40));
	}

	#[test]
	fn test_rejects_unknown_extensions() {
		let dir = tempfile::tempdir().unwrap();
		let bytes = encoded(10, 10, ImageFormat::Png);

		for filename in ["avatar.gif", "avatar.webp", "avatar"] {
			assert!(matches!(
				ingest(&bytes, filename, dir.path()),
				Err(IngestError::UnsupportedFormat)
			));
		}
	}

	#[test]
	fn test_extension_comparison_ignores_case() {
		assert_eq!(extension("Photo.JPG").as_deref(), Some("jpg"));

		let dir = tempfile::tempdir().unwrap();

		assert!(ingest(&encoded(10, 10, ImageFormat::Png), "UPPER.PNG", dir.path()).is_ok());
	}

	#[test]
	fn test_rejects_bytes_that_are_not_an_image() {
		let dir = tempfile::tempdir().unwrap();

		assert!(matches!(
			ingest(b"not an image at all", "photo.png", dir.path()),
			Err(IngestError::Image(_))
		));
	}

	#[test]
	fn test_every_upload_gets_a_fresh_name() {
		let dir = tempfile::tempdir().unwrap();
		let bytes = encoded(10, 10, ImageFormat::Png);

		let first = ingest(&bytes, "photo.png", dir.path()).unwrap();
		let second = ingest(&bytes, "photo.png", dir.path()).unwrap();

		assert_ne!(first, second);
		assert!(dir.path().join(&first).exists());
		assert!(dir.path().join(&second).exists());
	}

	#[test]
	fn test_default_picture_is_created_once() {
		let dir = tempfile::tempdir().unwrap();

		ensure_default(dir.path()).unwrap();

		let saved = image::open(dir.path().join(DEFAULT_IMAGE)).unwrap();

		assert_eq!(saved.dimensions(), (125, 125));

		// A second call leaves the existing file alone.
		ensure_default(dir.path()).unwrap();
	}
}
