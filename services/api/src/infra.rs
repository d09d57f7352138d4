use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cadre::config::AppConfig;
use cadre::error::AppError;
use cadre::storage::SqliteStore;
use cadre::workflows::accounts::SignupPolicy;
use cadre::workflows::attachments::FileStore;
use cadre::workflows::documents::CommandPdfRenderer;
use cadre::workflows::Portal;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<SqliteStore>,
}

/// Database, upload directory and PDF converter built from configuration.
pub(crate) struct Backends {
    pub(crate) store: Arc<SqliteStore>,
    pub(crate) files: Arc<FileStore>,
    pub(crate) renderer: Arc<CommandPdfRenderer>,
}

impl Backends {
    pub(crate) fn open(config: &AppConfig) -> Result<Self, AppError> {
        let store = SqliteStore::open(&config.storage.database_path)?;
        Ok(Self {
            store: Arc::new(store),
            files: Arc::new(FileStore::new(config.uploads.root.clone())),
            renderer: Arc::new(CommandPdfRenderer::new(
                config.documents.renderer_program.clone(),
            )),
        })
    }

    pub(crate) fn portal(&self, config: &AppConfig) -> Portal<SqliteStore, CommandPdfRenderer> {
        Portal::new(
            Arc::clone(&self.store),
            Arc::clone(&self.files),
            Arc::clone(&self.renderer),
            SignupPolicy {
                auto_activate: config.accounts.auto_activate,
            },
        )
    }
}
