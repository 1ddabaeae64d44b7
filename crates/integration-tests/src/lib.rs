//! Integration tests for Almacén.
//!
//! Each test starts the storefront router on an ephemeral local port and
//! drives it over HTTP with a cookie-keeping `reqwest` client, the way a
//! browser session would.
//!
//! ```bash
//! cargo test -p almacen-integration-tests
//! ```

use std::net::SocketAddr;

use almacen_core::Catalog;
use almacen_storefront::config::StorefrontConfig;
use almacen_storefront::state::AppState;
use reqwest::Client;

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    pub addr: SocketAddr,
}

impl TestServer {
    /// Bind to `127.0.0.1:0` and serve the storefront in a background task.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let state = AppState::new(StorefrontConfig::default(), Catalog::builtin());
        let app = almacen_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self { addr }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// A client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Pull the hidden checkout token out of a summary dialog.
#[must_use]
pub fn extract_token(html: &str) -> Option<String> {
    let marker = r#"name="token" value=""#;
    let start = html.find(marker)? + marker.len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(String::from)
}
