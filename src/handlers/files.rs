use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Settings;
use crate::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct FileInfo {
    pub filename: String,
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    pub size: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub originalname: String,
    pub size: u64,
}

/// Resolve `filename` inside the upload dir. Names carrying path separators
/// or parent components never match a stored file, so treat them as missing.
fn stored_path(upload_dir: &Path, filename: &str) -> Result<PathBuf, AppError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::NotFound);
    }
    Ok(upload_dir.join(filename))
}

/// GET /api/files
///
/// Lists stored files with size and modification time. A missing upload
/// directory yields an empty listing rather than an error.
pub async fn list_files(settings: web::Data<Settings>) -> Result<HttpResponse, AppError> {
    let dir = settings.upload_dir.clone();

    let files = web::block(move || -> Result<Vec<FileInfo>, AppError> {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            files.push(FileInfo {
                filename: entry.file_name().to_string_lossy().into_owned(),
                upload_date: DateTime::<Utc>::from(metadata.modified()?),
                size: metadata.len(),
            });
        }
        Ok(files)
    })
    .await??;

    Ok(HttpResponse::Ok().json(files))
}

/// Reduce a client-supplied filename to its final path component so the
/// stored name always resolves back through `stored_path`.
fn sanitize_filename(original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .replace("..", "_");
    if name.is_empty() {
        "file".to_string()
    } else {
        name
    }
}

/// POST /api/upload
///
/// Accepts a multipart upload and stores the part named `file` under
/// `<millis>-<originalname>`. Responds 400 when no such part is present.
pub async fn upload_file(
    mut payload: Multipart,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, AppError> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != "file" {
            continue;
        }
        let Some(original) = field.content_disposition().get_filename().map(str::to_owned)
        else {
            continue;
        };

        let stored = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(&original)
        );
        let path = settings.upload_dir.join(&stored);

        let mut file = web::block(move || fs::File::create(path)).await??;
        let mut size: u64 = 0;
        while let Some(chunk) = field.try_next().await? {
            size += chunk.len() as u64;
            file = web::block(move || file.write_all(&chunk).map(|_| file)).await??;
        }

        return Ok(HttpResponse::Ok().json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            filename: stored,
            originalname: original,
            size,
        }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// GET /api/files/download/{filename}
pub async fn download_file(
    path: web::Path<String>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, AppError> {
    let filename = path.into_inner();
    let file_path = stored_path(&settings.upload_dir, &filename)?;

    let data = web::block(move || fs::read(file_path)).await??;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(ContentDisposition::attachment(filename))
        .body(data))
}

/// DELETE /api/files/delete/{filename}
pub async fn delete_file(
    path: web::Path<String>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, AppError> {
    let file_path = stored_path(&settings.upload_dir, &path.into_inner())?;

    web::block(move || fs::remove_file(file_path)).await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "File deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_names_are_treated_as_missing() {
        let dir = Path::new("/tmp/uploads");
        assert!(matches!(
            stored_path(dir, "../etc/passwd"),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            stored_path(dir, "a/b.txt"),
            Err(AppError::NotFound)
        ));
        assert!(matches!(stored_path(dir, ""), Err(AppError::NotFound)));
    }

    #[test]
    fn plain_names_resolve_inside_upload_dir() {
        let dir = Path::new("/tmp/uploads");
        let path = stored_path(dir, "report.pdf").expect("plain name should resolve");
        assert_eq!(path, dir.join("report.pdf"));
    }

    #[test]
    fn uploaded_names_are_reduced_to_their_final_component() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir\\name.txt"), "name.txt");
        assert_eq!(sanitize_filename("a..b.txt"), "a_b.txt");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn sanitized_names_resolve_through_stored_path() {
        let dir = Path::new("/tmp/uploads");
        for raw in ["../../etc/passwd", "a/b/c.txt", "..", "x..y.bin", ""] {
            let name = sanitize_filename(raw);
            assert!(stored_path(dir, &name).is_ok(), "raw name {:?}", raw);
        }
    }
}
