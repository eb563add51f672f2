//! Integration tests for the ZIP+4 service and checkout client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zip4-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `validate_address` - Service endpoint against a fake USPS API
//! - `checkout_flow` - Checkout validator talking to a running service
//!
//! Nothing here touches the real USPS API: [`FakeUsps`] serves the token and
//! address endpoints on a local port, and [`TestService`] runs the real
//! router in front of it.

pub mod fake_usps;
pub mod session;

use std::net::SocketAddr;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use zip4_service::config::{ServiceConfig, ShopifyAppConfig, UspsConfig};
use zip4_service::{AppState, router};

pub use fake_usps::{FAKE_ACCESS_TOKEN, FakeUsps, full_zip_reply, no_plus4_reply};
pub use session::{
    TEST_API_KEY, TEST_API_SECRET, TEST_SHOP, session_claims, session_token, sign_session_token,
};

/// USPS consumer key handed to the service under test.
pub const TEST_CONSUMER_KEY: &str = "usps-consumer-key";

/// USPS consumer secret handed to the service under test.
pub const TEST_CONSUMER_SECRET: &str = "usps-consumer-secret";

/// Service configuration pointing at a USPS origin.
///
/// With `with_credentials == false` the consumer key and secret are left
/// unset, as on a deployment that forgot them.
#[must_use]
pub fn service_config(usps_base_url: Url, with_credentials: bool) -> ServiceConfig {
    let mut usps = UspsConfig::unconfigured(usps_base_url);
    if with_credentials {
        usps.consumer_key = Some(TEST_CONSUMER_KEY.to_string());
        usps.consumer_secret = Some(SecretString::from(TEST_CONSUMER_SECRET));
    }

    ServiceConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        shopify: ShopifyAppConfig {
            api_key: TEST_API_KEY.to_string(),
            api_secret: SecretString::from(TEST_API_SECRET),
        },
        usps,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The real service router, listening on an ephemeral port.
///
/// The server stops when this is dropped.
pub struct TestService {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestService {
    /// Bind `127.0.0.1:0` and serve the router built from `config`.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built or the port cannot be bound.
    pub async fn start(config: ServiceConfig) -> Self {
        let state = AppState::new(config).expect("service state");
        let app = router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test service");
        let addr = listener.local_addr().expect("test service address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test service");
        });

        Self { addr, handle }
    }

    /// Origin of the running service, with a trailing slash.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("service url")
    }

    /// Full URL of the validation endpoint.
    ///
    /// # Panics
    ///
    /// Never in practice; the path is a constant.
    #[must_use]
    pub fn validate_url(&self) -> Url {
        self.url()
            .join(zip4_service::VALIDATE_ADDRESS_PATH.trim_start_matches('/'))
            .expect("validate url")
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
