//! AdminServerBuilder for fluent API to build the admin HTTP server

use super::handlers::{AdminState, RecordServices};
use super::router::{build_admin_routes, health_routes};
use crate::config::AdminConfig;
use crate::core::auth::{AuthPolicy, AuthProvider, TokenAuthProvider};
use crate::core::nonce::{InMemoryNonceStore, NonceStore};
use crate::core::store::RecordStore;
use crate::engine::CsvExporter;
use crate::entities::{Account, ContentItem};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the admin server
///
/// Both record stores are required. The auth provider defaults to bearer
/// tokens from the configured principals, and the nonce store defaults to an
/// in-memory store using the configured TTL.
///
/// # Example
///
/// ```ignore
/// let app = AdminServerBuilder::new()
///     .with_config(AdminConfig::from_yaml_file("admin.yaml")?)
///     .with_content_store(InMemoryRecordStore::new())
///     .with_account_store(InMemoryRecordStore::new())
///     .build()?;
/// ```
pub struct AdminServerBuilder {
    config: AdminConfig,
    content_store: Option<Arc<dyn RecordStore<ContentItem>>>,
    account_store: Option<Arc<dyn RecordStore<Account>>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    nonce_store: Option<Arc<dyn NonceStore>>,
    custom_routes: Vec<Router>,
}

impl AdminServerBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: AdminConfig::default(),
            content_store: None,
            account_store: None,
            auth_provider: None,
            nonce_store: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AdminConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the content item store (required)
    pub fn with_content_store(mut self, store: impl RecordStore<ContentItem> + 'static) -> Self {
        self.content_store = Some(Arc::new(store));
        self
    }

    /// Set the account store (required)
    pub fn with_account_store(mut self, store: impl RecordStore<Account> + 'static) -> Self {
        self.account_store = Some(Arc::new(store));
        self
    }

    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Share a nonce store with the caller, e.g. to issue nonces in tests
    pub fn with_nonce_store(mut self, store: Arc<dyn NonceStore>) -> Self {
        self.nonce_store = Some(store);
        self
    }

    /// Add routes such as the admin pages that redirects land on
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Assemble the handler state
    pub fn build_state(&mut self) -> Result<AdminState> {
        self.config.validate()?;

        let content_store = self.content_store.take().ok_or_else(|| {
            anyhow::anyhow!("Content store is required. Call .with_content_store()")
        })?;
        let account_store = self.account_store.take().ok_or_else(|| {
            anyhow::anyhow!("Account store is required. Call .with_account_store()")
        })?;

        let auth_provider: Arc<dyn AuthProvider> = match self.auth_provider.take() {
            Some(provider) => provider,
            None => Arc::new(TokenAuthProvider::new(&self.config.principals)),
        };
        let nonces: Arc<dyn NonceStore> = match self.nonce_store.take() {
            Some(store) => store,
            None => Arc::new(InMemoryNonceStore::new(chrono::Duration::seconds(
                self.config.nonce.ttl_seconds,
            ))),
        };

        Ok(AdminState {
            content: RecordServices::new(content_store),
            accounts: RecordServices::new(account_store),
            exporter: CsvExporter::new(self.config.delimiter_byte()),
            auth_provider,
            nonces,
            policy: AuthPolicy::parse_policy(&self.config.access_policy),
            config: Arc::new(self.config.clone()),
        })
    }

    /// Build the final router: health checks, admin actions, custom routes
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;

        let mut app = health_routes().merge(build_admin_routes(state));
        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.bind` from the configuration and handles SIGTERM and
    /// SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.server.bind).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build()?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, "admin server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(%addr, "admin server stopped");
        Ok(())
    }
}

impl Default for AdminServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = received, "draining in-flight admin requests");
}
