//! Image capture: pick a file, preview it, choose a square crop, rasterize
//! exactly the cropped pixels in the file's own format and upload the result.
//!
//! Crop percentages refer to the image as a browser displays it, so EXIF
//! orientation is applied before any pixel is mapped.

use crate::api::{EncodedImage, ProfileApi};
use crate::error::AppError;
use crate::model::CropRect;
use crate::state::session::CreationSession;
use crate::util::data_url;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

/// 2 MiB. Files of exactly this size are accepted.
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// A local file read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
struct Selection {
    file: PickedFile,
    preview: String,
    /// Displayed width and height.
    dimensions: (u32, u32),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageCapture {
    selection: Option<Selection>,
    crop: CropRect,
}

impl ImageCapture {
    pub fn check_size(size: u64) -> Result<(), AppError> {
        if size > MAX_IMAGE_BYTES {
            return Err(AppError::FileTooLarge { size, limit: MAX_IMAGE_BYTES });
        }
        Ok(())
    }

    /// Replaces the current selection and starts from the largest centred
    /// square. An oversize or undecodable file is rejected and the previous
    /// selection stays as it was.
    pub fn select_file(&mut self, file: PickedFile) -> Result<(), AppError> {
        Self::check_size(file.bytes.len() as u64)?;
        let (width, height) = displayed_dimensions(&file)?;
        let preview = data_url(&file.media_type, &file.bytes);
        self.selection = Some(Selection { file, preview, dimensions: (width, height) });
        self.crop = CropRect::centered_square(width, height);
        Ok(())
    }

    pub fn preview(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.preview.as_str())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.file.name.as_str())
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    /// Height follows width so the region stays square in pixels.
    pub fn update_crop(&mut self, rect: CropRect) {
        self.crop = match &self.selection {
            Some(s) => rect.square_on(s.dimensions.0, s.dimensions.1),
            None => rect.clamped(),
        };
    }

    /// Takes the pending selection and resets the form, whatever happens to
    /// the returned job afterwards.
    pub fn take_job(&mut self) -> Option<CropJob> {
        let selection = self.selection.take()?;
        let crop = std::mem::take(&mut self.crop);
        Some(CropJob { file: selection.file, crop })
    }
}

/// Pixel rectangle inside the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Maps a percentage crop onto a `width` x `height` image. Fractional
    /// pixels are truncated; a region with no pixels is an error.
    pub fn from_crop(crop: &CropRect, width: u32, height: u32) -> Result<Self, AppError> {
        let crop = crop.clamped();
        let scale = |dim: u32, pct: f64| ((dim as f64) * pct / 100.0).floor() as u32;
        let x = scale(width, crop.x).min(width);
        let y = scale(height, crop.y).min(height);
        let w = scale(width, crop.width).min(width - x);
        let h = scale(height, crop.height).min(height - y);
        if w == 0 || h == 0 {
            return Err(AppError::DegenerateCrop);
        }
        Ok(Self { x, y, width: w, height: h })
    }

    /// Trims the longer side so the region is square.
    pub fn squared(self) -> Self {
        let side = self.width.min(self.height);
        Self { width: side, height: side, ..self }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CropJob {
    pub file: PickedFile,
    pub crop: CropRect,
}

fn image_format(file: &PickedFile) -> Result<ImageFormat, AppError> {
    let format = ImageFormat::from_mime_type(&file.media_type)
        .or_else(|| image::guess_format(&file.bytes).ok())
        .ok_or_else(|| AppError::UnsupportedImage(file.media_type.clone()))?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg => Ok(format),
        other => Err(AppError::UnsupportedImage(format!("{:?}", other))),
    }
}

fn open_decoder(
    file: &PickedFile,
    format: ImageFormat,
) -> Result<impl ImageDecoder + '_, AppError> {
    Ok(ImageReader::with_format(Cursor::new(file.bytes.as_slice()), format).into_decoder()?)
}

/// Width and height after EXIF orientation.
fn displayed_dimensions(file: &PickedFile) -> Result<(u32, u32), AppError> {
    let mut decoder = open_decoder(file, image_format(file)?)?;
    let (width, height) = decoder.dimensions();
    let swaps = matches!(
        decoder.orientation()?,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    );
    Ok(if swaps { (height, width) } else { (width, height) })
}

/// Decodes the file upright.
fn decode_upright(file: &PickedFile, format: ImageFormat) -> Result<DynamicImage, AppError> {
    let mut decoder = open_decoder(file, format)?;
    let orientation = decoder.orientation()?;
    let mut upright = DynamicImage::from_decoder(decoder)?;
    upright.apply_orientation(orientation);
    Ok(upright)
}

impl CropJob {
    /// Decodes the file upright, copies the square crop region one to one
    /// and re-encodes it in the same format.
    pub fn rasterize(&self) -> Result<EncodedImage, AppError> {
        let format = image_format(&self.file)?;
        let source = decode_upright(&self.file, format)?;
        let rect = PixelRect::from_crop(&self.crop, source.width(), source.height())?.squared();
        let mut cropped = source.crop_imm(rect.x, rect.y, rect.width, rect.height);
        if format == ImageFormat::Jpeg {
            // jpeg has no alpha channel
            cropped = DynamicImage::ImageRgb8(cropped.to_rgb8());
        }
        let mut out = Cursor::new(Vec::new());
        cropped.write_to(&mut out, format)?;
        Ok(EncodedImage {
            file_name: self.file.name.clone(),
            media_type: format.to_mime_type().to_string(),
            bytes: out.into_inner(),
        })
    }
}

/// Rasterize, upload, then publish the URL into the session. On failure the
/// session is left untouched.
pub async fn upload_cropped(
    job: CropJob,
    api: &dyn ProfileApi,
    session: &CreationSession,
) -> Result<String, AppError> {
    let encoded = job.rasterize()?;
    let url = api.upload_image(encoded).await?;
    log::info!("profile image uploaded: {}", url);
    session.publish_image_url(url.clone());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fakes::FakeApi;
    use futures::executor::block_on;
    use image::{GenericImageView, Rgba, RgbaImage};
    use rstest::rstest;

    /// What the upload form does on submit.
    fn submit(
        capture: &mut ImageCapture,
        api: &FakeApi,
        session: &CreationSession,
    ) -> Result<Option<String>, AppError> {
        match capture.take_job() {
            Some(job) => block_on(upload_cropped(job, api, session)).map(Some),
            None => Ok(None),
        }
    }

    /// Every pixel encodes its own coordinates: r = x, g = y.
    fn coordinate_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn png_file(name: &str, width: u32, height: u32) -> PickedFile {
        PickedFile {
            name: name.into(),
            media_type: "image/png".into(),
            bytes: coordinate_png(width, height),
        }
    }

    #[rstest]
    #[case(0, true)]
    #[case(MAX_IMAGE_BYTES, true)]
    #[case(MAX_IMAGE_BYTES + 1, false)]
    fn size_limit_is_inclusive(#[case] size: u64, #[case] ok: bool) {
        assert_eq!(ImageCapture::check_size(size).is_ok(), ok);
    }

    #[test]
    fn accepted_file_gets_a_preview() {
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("me.png", 4, 4)).unwrap();
        let preview = capture.preview().unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
        assert!(preview.len() > "data:image/png;base64,".len());
        assert_eq!(capture.file_name(), Some("me.png"));
    }

    #[test]
    fn oversize_file_is_rejected_without_preview() {
        let mut capture = ImageCapture::default();
        let big = PickedFile {
            name: "huge.png".into(),
            media_type: "image/png".into(),
            bytes: vec![0; (MAX_IMAGE_BYTES + 1) as usize],
        };
        let err = capture.select_file(big).unwrap_err();
        assert!(matches!(err, AppError::FileTooLarge { .. }));
        assert_eq!(capture.preview(), None);
    }

    #[test]
    fn second_selection_replaces_the_first() {
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("first.png", 4, 4)).unwrap();
        capture.update_crop(CropRect { x: 10.0, y: 10.0, width: 50.0, height: 50.0 });
        let first_preview = capture.preview().unwrap().to_string();

        capture.select_file(png_file("second.png", 8, 8)).unwrap();
        assert_eq!(capture.file_name(), Some("second.png"));
        assert_ne!(capture.preview().unwrap(), first_preview);
        assert_eq!(capture.crop(), CropRect::default());
    }

    #[rstest]
    #[case(CropRect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 }, (0, 0, 200, 100))]
    #[case(CropRect { x: 25.0, y: 10.0, width: 50.0, height: 50.0 }, (50, 10, 100, 50))]
    #[case(CropRect { x: 50.0, y: 50.0, width: 25.0, height: 50.0 }, (100, 50, 50, 50))]
    #[case(CropRect { x: 10.5, y: 0.0, width: 33.3, height: 100.0 }, (21, 0, 66, 100))]
    fn maps_percent_to_pixels(#[case] crop: CropRect, #[case] expected: (u32, u32, u32, u32)) {
        let r = PixelRect::from_crop(&crop, 200, 100).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), expected);
    }

    #[rstest]
    #[case(CropRect { x: 0.0, y: 0.0, width: 0.0, height: 100.0 })]
    #[case(CropRect { x: 0.0, y: 0.0, width: 100.0, height: 0.4 })]
    #[case(CropRect { x: 100.0, y: 0.0, width: 10.0, height: 10.0 })]
    fn empty_regions_are_rejected(#[case] crop: CropRect) {
        assert_eq!(PixelRect::from_crop(&crop, 200, 100), Err(AppError::DegenerateCrop));
    }

    /// 40x20 JPEG, left half red and right half blue.
    fn split_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_fn(40, 20, |x, _| {
            if x < 20 { image::Rgb([220, 20, 20]) } else { image::Rgb([20, 20, 220]) }
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut buf, ImageFormat::Jpeg).unwrap();
        buf.into_inner()
    }

    /// Inserts an APP1 Exif segment carrying `orientation` right after SOI.
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut exif = b"Exif\0\0".to_vec();
        // big-endian TIFF header, IFD0 at offset 8
        exif.extend_from_slice(&[b'M', b'M', 0, 42, 0, 0, 0, 8]);
        // one entry: tag 0x0112, SHORT, count 1, value
        exif.extend_from_slice(&[0, 1, 0x01, 0x12, 0, 3, 0, 0, 0, 1]);
        exif.extend_from_slice(&orientation.to_be_bytes());
        exif.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        let len = (exif.len() + 2) as u16;

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&exif);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    fn jpeg_file(bytes: Vec<u8>) -> PickedFile {
        PickedFile { name: "a.jpg".into(), media_type: "image/jpeg".into(), bytes }
    }

    fn decoded(encoded: &EncodedImage) -> DynamicImage {
        image::load_from_memory(&encoded.bytes).unwrap()
    }

    #[test]
    fn rasterizes_exactly_the_crop_region() {
        let job = CropJob {
            file: png_file("me.png", 200, 100),
            crop: CropRect { x: 25.0, y: 10.0, width: 25.0, height: 50.0 },
        };
        let encoded = job.rasterize().unwrap();
        assert_eq!(encoded.media_type, "image/png");
        assert_eq!(encoded.file_name, "me.png");

        let out = image::load_from_memory_with_format(&encoded.bytes, ImageFormat::Png).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
        assert_eq!(out.get_pixel(0, 0), Rgba([50, 10, 0, 255]));
        assert_eq!(out.get_pixel(49, 49), Rgba([99, 59, 0, 255]));
    }

    #[test]
    fn output_is_square_even_for_a_wide_crop() {
        let job = CropJob {
            file: png_file("me.png", 100, 100),
            crop: CropRect { x: 0.0, y: 0.0, width: 100.0, height: 40.0 },
        };
        assert_eq!(decoded(&job.rasterize().unwrap()).dimensions(), (40, 40));
    }

    #[test]
    fn jpeg_stays_jpeg() {
        let job = CropJob {
            file: jpeg_file(split_jpeg()),
            crop: CropRect { x: 0.0, y: 0.0, width: 50.0, height: 100.0 },
        };
        let encoded = job.rasterize().unwrap();
        assert_eq!(encoded.media_type, "image/jpeg");
        assert_eq!(image::guess_format(&encoded.bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!(decoded(&encoded).dimensions(), (20, 20));
    }

    #[test]
    fn rotated_photo_is_cropped_as_displayed() {
        // orientation 6: stored 40x20, displayed 20x40 with the left half on top
        let file = jpeg_file(with_exif_orientation(&split_jpeg(), 6));
        let job = CropJob { file, crop: CropRect { x: 0.0, y: 50.0, width: 100.0, height: 50.0 } };

        let out = decoded(&job.rasterize().unwrap()).to_rgb8();
        assert_eq!(out.dimensions(), (20, 20));
        let px = out.get_pixel(10, 10);
        assert!(px[2] > px[0], "bottom of the displayed image is blue, got {:?}", px);
    }

    #[test]
    fn selection_uses_displayed_dimensions() {
        let mut capture = ImageCapture::default();
        capture.select_file(jpeg_file(with_exif_orientation(&split_jpeg(), 6))).unwrap();
        assert_eq!(
            capture.crop(),
            CropRect { x: 0.0, y: 25.0, width: 100.0, height: 50.0 }
        );
    }

    #[test]
    fn crop_updates_stay_square_on_a_wide_image() {
        let api = FakeApi::default();
        let session = CreationSession::new();
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("wide.png", 100, 40)).unwrap();
        assert_eq!(
            capture.crop(),
            CropRect { x: 30.0, y: 0.0, width: 40.0, height: 100.0 }
        );

        capture.update_crop(CropRect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 });
        assert_eq!(capture.crop(), CropRect { x: 0.0, y: 0.0, width: 40.0, height: 100.0 });

        submit(&mut capture, &api, &session).unwrap();
        let uploads = api.uploads.borrow();
        let out = image::load_from_memory(&uploads[0].bytes).unwrap();
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(out.get_pixel(39, 39), Rgba([39, 39, 0, 255]));
    }

    #[test]
    fn undecodable_file_keeps_the_previous_selection() {
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("me.png", 4, 4)).unwrap();
        let broken = PickedFile {
            name: "broken.png".into(),
            media_type: "image/png".into(),
            bytes: b"not a png".to_vec(),
        };
        assert!(capture.select_file(broken).is_err());
        assert_eq!(capture.file_name(), Some("me.png"));
    }

    #[test]
    fn unknown_media_type_is_sniffed() {
        let mut file = png_file("blob", 10, 10);
        file.media_type = String::new();
        let job = CropJob { file, crop: CropRect::default() };
        assert_eq!(job.rasterize().unwrap().media_type, "image/png");
    }

    #[test]
    fn non_image_bytes_are_unsupported() {
        let file = PickedFile {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
            bytes: b"hello".to_vec(),
        };
        let job = CropJob { file, crop: CropRect::default() };
        assert!(matches!(job.rasterize(), Err(AppError::UnsupportedImage(_))));
    }

    #[test]
    fn submit_without_selection_is_noop() {
        let api = FakeApi::default();
        let session = CreationSession::new();
        let mut capture = ImageCapture::default();
        assert_eq!(submit(&mut capture, &api, &session), Ok(None));
        assert!(api.uploads.borrow().is_empty());
    }

    #[test]
    fn successful_upload_publishes_url_and_resets_form() {
        let api = FakeApi::default();
        let session = CreationSession::new();
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("me.png", 20, 20)).unwrap();
        capture.update_crop(CropRect { x: 0.0, y: 0.0, width: 50.0, height: 50.0 });

        let url = submit(&mut capture, &api, &session).unwrap();
        assert_eq!(url.as_deref(), Some("https://img.example.com/me.png"));
        assert_eq!(session.image_url(), url);
        assert_eq!(capture.preview(), None);
        assert_eq!(capture.crop(), CropRect::default());

        let uploads = api.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].file_name, "me.png");
    }

    #[test]
    fn failed_upload_keeps_session_and_still_resets_form() {
        let api = FakeApi::failing(AppError::Network("offline".into()));
        let session = CreationSession::new();
        session.publish_image_url("https://img.example.com/old.png".into());
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("me.png", 20, 20)).unwrap();

        let res = submit(&mut capture, &api, &session);
        assert_eq!(res, Err(AppError::Network("offline".into())));
        assert_eq!(session.image_url().as_deref(), Some("https://img.example.com/old.png"));
        assert_eq!(capture.preview(), None);
    }

    #[test]
    fn degenerate_crop_never_uploads() {
        let api = FakeApi::default();
        let session = CreationSession::new();
        let mut capture = ImageCapture::default();
        capture.select_file(png_file("me.png", 20, 20)).unwrap();
        capture.update_crop(CropRect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 });

        let res = submit(&mut capture, &api, &session);
        assert_eq!(res, Err(AppError::DegenerateCrop));
        assert!(api.uploads.borrow().is_empty());
        assert_eq!(session.image_url(), None);
    }
}
