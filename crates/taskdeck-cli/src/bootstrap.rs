use std::sync::Arc;

use anyhow::{Context, Result};
use taskdeck_application::{Navigator, SortedTodos, TodoStore};
use taskdeck_infrastructure::{ClientConfig, LocalRepository, TomlKeyValueStore};
use taskdeck_interaction::{ApiClient, AuthSession, HttpContext, HttpTransport, ReqwestTransport};

/// Everything a command needs, wired once per process.
pub struct AppContext {
    pub config: ClientConfig,
    pub auth: Arc<AuthSession>,
    pub todos: TodoStore,
    pub view: SortedTodos,
    pub navigator: Navigator,
}

pub async fn bootstrap(config: ClientConfig) -> Result<AppContext> {
    bootstrap_with(config, Arc::new(ReqwestTransport::new())).await
}

/// Wires storage, session, client and stores on top of `transport`.
pub async fn bootstrap_with(
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<AppContext> {
    let storage_path = config
        .storage_path()
        .context("Failed to resolve storage path")?;
    tracing::debug!("[Bootstrap] Storage: {}", storage_path.display());
    tracing::debug!("[Bootstrap] API: {}", config.api_base_url);

    let repository = Arc::new(LocalRepository::new(Arc::new(TomlKeyValueStore::new(
        storage_path,
    ))));
    let http = HttpContext::new(transport, config.api_base_url.clone());

    let auth = Arc::new(
        AuthSession::restore(http.clone(), repository.clone())
            .await
            .context("Failed to restore session")?,
    );
    let client = ApiClient::new(http, auth.clone(), repository.clone());

    Ok(AppContext {
        config,
        todos: TodoStore::new(client),
        view: SortedTodos::new(repository),
        navigator: Navigator::new(auth.clone()),
        auth,
    })
}
