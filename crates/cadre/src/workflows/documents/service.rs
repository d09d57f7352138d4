use std::sync::Arc;

use tracing::{error, info};

use super::renderer::{PdfRenderer, RenderError};
use super::template;
use crate::workflows::decisions::DecisionRecord;

/// PDF bytes plus the file name offered to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Set when the error page was rendered in place of the decision.
    pub fallback: bool,
}

/// Turns decision records into PDF documents.
pub struct DocumentService<P> {
    renderer: Arc<P>,
}

impl<P> DocumentService<P>
where
    P: PdfRenderer + 'static,
{
    pub fn new(renderer: Arc<P>) -> Self {
        Self { renderer }
    }

    /// Render the decision, or the "no data" page when there is none.
    ///
    /// A renderer failure on the decision page is logged and replaced by an error
    /// page; only a failure to render that page is returned to the caller.
    pub async fn render_decision(
        &self,
        record: Option<&DecisionRecord>,
    ) -> Result<RenderedDocument, RenderError> {
        let (html, filename) = match record {
            Some(DecisionRecord::Committee(record)) => (
                template::committee_page(record),
                decision_filename(&record.decision.decision_number),
            ),
            Some(DecisionRecord::Appointment(record)) => (
                template::appointment_page(record),
                appointment_filename(&record.decision.decision_number),
            ),
            None => (template::no_data_page(), "no_data.pdf".to_string()),
        };

        match self.render_html(html).await {
            Ok(bytes) => {
                info!(%filename, bytes = bytes.len(), "rendered decision pdf");
                Ok(RenderedDocument {
                    bytes,
                    filename,
                    fallback: false,
                })
            }
            Err(err) => {
                error!(error = %err, %filename, "pdf rendering failed; using error page");
                let bytes = self
                    .render_html(template::error_page(
                        "حدث خطأ أثناء إنشاء ملف PDF، حاول مرة أخرى.",
                    ))
                    .await?;
                Ok(RenderedDocument {
                    bytes,
                    filename: "error.pdf".to_string(),
                    fallback: true,
                })
            }
        }
    }

    async fn render_html(&self, html: String) -> Result<Vec<u8>, RenderError> {
        let renderer = Arc::clone(&self.renderer);
        tokio::task::spawn_blocking(move || renderer.render(&html))
            .await
            .map_err(|err| RenderError::Task(err.to_string()))?
    }
}

/// `decision_<number>.pdf` for committee decisions.
pub fn decision_filename(decision_number: &str) -> String {
    pdf_filename("decision", decision_number)
}

/// `appointment_<number>.pdf` for appointment decisions.
pub fn appointment_filename(decision_number: &str) -> String {
    pdf_filename("appointment", decision_number)
}

/// Characters unsafe for a header value are replaced with `_`.
fn pdf_filename(prefix: &str, decision_number: &str) -> String {
    let safe: String = decision_number
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}_{safe}.pdf")
}
