use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// How the browser should treat a returned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    pub fn header_value(&self, filename: &str) -> String {
        let kind = match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        };
        format!("{kind}; filename=\"{filename}\"")
    }
}

/// File body with a content type guessed from `filename`.
pub fn file_response(bytes: Vec<u8>, filename: &str, disposition: Disposition) -> Response {
    let content_type = mime_guess::from_path(filename).first_or_octet_stream();
    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(content_type.essence_str()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    let download_name = filename.rsplit('/').next().unwrap_or(filename);
    if let Ok(value) = HeaderValue::from_str(&disposition.header_value(download_name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
