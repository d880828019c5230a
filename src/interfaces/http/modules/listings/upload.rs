//! Multipart listing form handling
//!
//! Text parts fill a `ListingSubmission`; file parts are written to the
//! upload directory and later re-encoded. Raw files never outlive the
//! request that produced them.

use axum::extract::multipart::{Multipart, MultipartError};
use tracing::warn;

use crate::domain::{DomainError, ListingPhotos, ListingSubmission, PhotoKind};
use crate::infrastructure::storage::StoredUpload;
use crate::infrastructure::ImageStore;
use crate::interfaces::http::common::{ApiError, ApiResult};

/// A parsed listing form with its raw uploads.
pub struct ListingForm {
    pub submission: ListingSubmission,
    pub uploads: Vec<StoredUpload>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), e.body_text())
}

/// Reads every part of the form. On error, uploads written so far are
/// removed before returning.
pub async fn read_listing_form(images: &ImageStore, multipart: Multipart) -> ApiResult<ListingForm> {
    let mut form = ListingForm {
        submission: ListingSubmission::default(),
        uploads: Vec::new(),
    };

    match read_parts(images, multipart, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            images.discard(&form.uploads).await;
            Err(e)
        }
    }
}

async fn read_parts(
    images: &ImageStore,
    mut multipart: Multipart,
    form: &mut ListingForm,
) -> ApiResult<()> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let kind = PhotoKind::from_field_name(name.trim_end_matches("[]"));
        let Some(kind) = kind else {
            let value = field.text().await.map_err(multipart_error)?;
            form.submission.set_field(&name, value);
            continue;
        };

        // Browsers send an empty part for file inputs left blank.
        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if original_name.is_empty() || bytes.is_empty() {
            continue;
        }

        let count = form.uploads.iter().filter(|u| u.kind == kind).count();
        if count >= kind.max_files() {
            return Err(ApiError::bad_request(format!(
                "{}: at most {} file(s) allowed",
                kind.field_name(),
                kind.max_files()
            )));
        }

        let upload = images.save_upload(kind, &original_name, &bytes).await?;
        form.uploads.push(upload);
    }
    Ok(())
}

/// Re-encodes every upload. Files that are not decodable images are
/// skipped; the rest keep their upload order within each kind.
pub async fn compress_uploads(
    images: &ImageStore,
    uploads: &[StoredUpload],
) -> ApiResult<Vec<(PhotoKind, String)>> {
    let mut compressed = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match images.compress(upload).await {
            Ok(name) => compressed.push((upload.kind, name)),
            Err(DomainError::Validation(msg)) => warn!("Skipping upload: {}", msg),
            Err(e) => {
                let names: Vec<String> = compressed.into_iter().map(|(_, n)| n).collect();
                images.remove_files(&names).await;
                return Err(e.into());
            }
        }
    }
    Ok(compressed)
}

/// Groups compressed files by photo kind, skipping kinds with no files.
pub fn group_by_kind(files: &[(PhotoKind, String)]) -> Vec<(PhotoKind, Vec<String>)> {
    PhotoKind::ALL
        .iter()
        .filter_map(|kind| {
            let names: Vec<String> = files
                .iter()
                .filter(|(k, _)| k == kind)
                .map(|(_, n)| n.clone())
                .collect();
            (!names.is_empty()).then_some((*kind, names))
        })
        .collect()
}

pub fn to_photos(files: &[(PhotoKind, String)]) -> ListingPhotos {
    let mut photos = ListingPhotos::default();
    for (kind, names) in group_by_kind(files) {
        photos.set(kind, names);
    }
    photos
}
