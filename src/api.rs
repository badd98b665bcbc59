//! Client for the remote profile API.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{Profile, ProfileDetails};
use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};
use web_sys::{Blob, BlobPropertyBag, FormData};

/// Multipart field name expected by the image endpoint.
pub const IMAGE_FIELD: &str = "image";

/// A rasterized image ready for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait(?Send)]
pub trait ProfileApi {
    /// Stores an image and returns its public URL.
    async fn upload_image(&self, image: EncodedImage) -> Result<String, AppError>;
    /// Creates a profile and returns the id assigned by the backend.
    async fn create_profile(&self, details: &ProfileDetails) -> Result<String, AppError>;
    async fn fetch_profile(&self, id: &str) -> Result<Profile, AppError>;
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateProfileRequest<'a> {
    pub body: &'a ProfileDetails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProfileResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadImageResponse {
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FetchProfileResponse {
    #[serde(rename = "Item", alias = "item")]
    pub item: Profile,
}

pub struct HttpProfileApi {
    config: AppConfig,
}

impl HttpProfileApi {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn multipart(image: &EncodedImage) -> Result<FormData, AppError> {
        let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let opts = BlobPropertyBag::new();
        opts.set_type(&image.media_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(AppError::from_js)?;
        let form = FormData::new().map_err(AppError::from_js)?;
        form.append_with_blob_and_filename(IMAGE_FIELD, &blob, &image.file_name)
            .map_err(AppError::from_js)?;
        Ok(form)
    }
}

/// Maps non-2xx responses to [`AppError::Server`].
fn ensure_ok(response: Response) -> Result<Response, AppError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(AppError::Server {
            status: response.status(),
            message: response.status_text(),
        })
    }
}

#[async_trait(?Send)]
impl ProfileApi for HttpProfileApi {
    async fn upload_image(&self, image: EncodedImage) -> Result<String, AppError> {
        let url = self.config.api_url("profileImage");
        log::debug!("uploading {} ({} bytes)", image.file_name, image.bytes.len());
        let form = Self::multipart(&image)?;
        let response = ensure_ok(Request::post(&url).body(form)?.send().await?)?;
        let body: UploadImageResponse = response.json().await?;
        Ok(body.image_url)
    }

    async fn create_profile(&self, details: &ProfileDetails) -> Result<String, AppError> {
        let url = self.config.api_url("profile");
        let request = Request::post(&url).json(&CreateProfileRequest { body: details })?;
        let response = ensure_ok(request.send().await?)?;
        let body: CreateProfileResponse = response.json().await?;
        Ok(body.id)
    }

    async fn fetch_profile(&self, id: &str) -> Result<Profile, AppError> {
        let url = self.config.api_url(&format!("profile/{}", id));
        let response = ensure_ok(Request::get(&url).send().await?)?;
        let body: FetchProfileResponse = response.json().await?;
        Ok(body.item)
    }
}
