use std::collections::HashMap;

use axum::extract::Multipart;

use super::store::AttachmentError;

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields and file parts of a multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Files sent under `field`, in body order.
    pub fn files_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> {
        self.files.iter().filter(move |file| file.field == field)
    }
}

/// Drain a multipart body. File inputs left empty by the browser are skipped.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm, AttachmentError> {
    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AttachmentError::Multipart(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AttachmentError::Multipart(err.to_string()))?;
                if file_name.is_empty() {
                    continue;
                }
                form.files.push(UploadedFile {
                    field: name,
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AttachmentError::Multipart(err.to_string()))?;
                form.fields.insert(name, value);
            }
        }
    }
    Ok(form)
}
