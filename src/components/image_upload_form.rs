use super::app::AppServices;
use crate::error::AppError;
use crate::model::CropRect;
use crate::platform::alert;
use crate::state::capture::upload_cropped;
use crate::state::{CreationSession, ImageCapture, PickedFile};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

async fn read_file(file: &File) -> Result<PickedFile, AppError> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(AppError::from_js)?;
    Ok(PickedFile {
        name: file.name(),
        media_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

/// Slider handles of the square crop. The height is derived from the size.
#[derive(Clone, Copy, PartialEq)]
enum CropHandle {
    Left,
    Top,
    Size,
}

impl CropHandle {
    fn label(self) -> &'static str {
        match self {
            CropHandle::Left => "Left",
            CropHandle::Top => "Top",
            CropHandle::Size => "Size",
        }
    }

    fn get(self, r: &CropRect) -> f64 {
        match self {
            CropHandle::Left => r.x,
            CropHandle::Top => r.y,
            CropHandle::Size => r.width,
        }
    }

    fn set(self, r: &mut CropRect, v: f64) {
        match self {
            CropHandle::Left => r.x = v,
            CropHandle::Top => r.y = v,
            CropHandle::Size => r.width = v,
        }
    }
}

#[function_component(ImageUploadForm)]
pub fn image_upload_form() -> Html {
    let services = use_context::<AppServices>();
    let session = use_context::<CreationSession>();
    let capture = use_mut_ref(ImageCapture::default);
    let refresh = use_force_update();
    let uploading = use_state(|| false);
    let upload_error = use_state(|| None::<String>);

    let on_file = {
        let capture = capture.clone();
        let refresh = refresh.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input.files().and_then(|files| files.get(0));
            // allow picking the same file again
            input.set_value("");
            let Some(file) = file else { return };
            if let Err(err) = ImageCapture::check_size(file.size() as u64) {
                log::info!("rejected {}: {}", file.name(), err);
                alert("The file is too large. Please choose an image of 2 MB or less.");
                return;
            }
            let capture = capture.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                let picked = match read_file(&file).await {
                    Ok(picked) => picked,
                    Err(e) => {
                        log::error!("could not read {}: {}", file.name(), e);
                        return;
                    }
                };
                let selected = capture.borrow_mut().select_file(picked);
                match selected {
                    Ok(()) => refresh.force_update(),
                    Err(e) => alert(&e.to_string()),
                }
            });
        })
    };

    let crop_slider = |handle: CropHandle| {
        let capture = capture.clone();
        let refresh = refresh.clone();
        let value = handle.get(&capture.borrow().crop());
        let oninput = Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut rect = capture.borrow().crop();
            handle.set(&mut rect, input.value_as_number());
            capture.borrow_mut().update_crop(rect);
            refresh.force_update();
        });
        html! {
            <label class="crop-slider">
                <span>{ handle.label() }</span>
                <input type="range" min="0" max="100" step="1"
                    value={value.to_string()} {oninput} />
            </label>
        }
    };

    let onsubmit = {
        let capture = capture.clone();
        let refresh = refresh.clone();
        let uploading = uploading.clone();
        let upload_error = upload_error.clone();
        let services = services.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(services), Some(session)) = (services.clone(), session.clone()) else {
                log::error!("upload form rendered outside the create page");
                return;
            };
            let Some(job) = capture.borrow_mut().take_job() else { return };
            refresh.force_update();
            uploading.set(true);
            upload_error.set(None);
            let uploading = uploading.clone();
            let upload_error = upload_error.clone();
            spawn_local(async move {
                match upload_cropped(job, services.api.as_ref(), &session).await {
                    Ok(_) => {}
                    Err(AppError::DegenerateCrop) => {
                        alert("The selected area is empty. Please choose a larger area.");
                    }
                    Err(e) => {
                        log::error!("uploading profile image failed: {}", e);
                        upload_error.set(Some("Upload failed. Please try again.".into()));
                    }
                }
                uploading.set(false);
            });
        })
    };

    let current = capture.borrow();
    let cropper = current.preview().map(|src| {
        let c = current.crop();
        let frame = format!(
            "left:{}%; top:{}%; width:{}%; height:{}%;",
            c.x, c.y, c.width, c.height
        );
        html! {
            <div class="cropper">
                <div class="crop-stage">
                    <img src={src.to_string()} alt="Selected image" />
                    <div class="crop-frame" style={frame}></div>
                </div>
                { crop_slider(CropHandle::Left) }
                { crop_slider(CropHandle::Top) }
                { crop_slider(CropHandle::Size) }
            </div>
        }
    });

    html! {
        <form class="upload-form" {onsubmit}>
            <input type="file" id="file-input" accept=".jpg, .jpeg, .png" style="display:none"
                onchange={on_file} />
            <label for="file-input" class="button">{"Choose file"}</label>
            if let Some(name) = current.file_name() {
                <span class="file-name">{ name.to_string() }</span>
            }
            { cropper }
            <button type="submit" class="button" disabled={*uploading}>
                { if *uploading { "Uploading…" } else { "Upload" } }
            </button>
            if let Some(msg) = (*upload_error).clone() {
                <p class="warning">{ msg }</p>
            }
        </form>
    }
}
