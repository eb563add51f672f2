//! Local stand-in for the USPS OAuth and Addresses APIs.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Access token issued by the fake token endpoint.
pub const FAKE_ACCESS_TOKEN: &str = "fake-usps-access-token";

#[derive(Default)]
struct Recorded {
    token_requests: Vec<Value>,
    address_queries: Vec<HashMap<String, String>>,
    authorizations: Vec<String>,
}

struct FakeUspsState {
    token_failure: Option<(StatusCode, String)>,
    address_reply: (StatusCode, Value),
    recorded: Recorded,
}

type Shared = Arc<Mutex<FakeUspsState>>;

/// Fake USPS API on an ephemeral port.
///
/// Issues [`FAKE_ACCESS_TOKEN`] and answers every address lookup with the
/// configured reply (by default a full ZIP+4 for 1 Market St). Every request
/// is recorded for later assertions. The server stops when this is dropped.
pub struct FakeUsps {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl FakeUsps {
    /// Start the fake on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the port cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeUspsState {
            token_failure: None,
            address_reply: (StatusCode::OK, full_zip_reply("94105", "1234")),
            recorded: Recorded::default(),
        }));

        let app = Router::new()
            .route("/oauth2/v3/token", post(token))
            .route("/addresses/v3/address", get(address))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake USPS");
        let addr = listener.local_addr().expect("fake USPS address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake USPS");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Origin to configure as `USPS_API_BASE_URL`.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("fake USPS url")
    }

    /// Answer address lookups with `body` and `status`.
    pub fn set_address_reply(&self, status: StatusCode, body: Value) {
        self.lock().address_reply = (status, body);
    }

    /// Reject every token request with `status` and a plain-text body.
    pub fn fail_token(&self, status: StatusCode, body: &str) {
        self.lock().token_failure = Some((status, body.to_string()));
    }

    #[must_use]
    pub fn token_requests(&self) -> Vec<Value> {
        self.lock().recorded.token_requests.clone()
    }

    #[must_use]
    pub fn address_queries(&self) -> Vec<HashMap<String, String>> {
        self.lock().recorded.address_queries.clone()
    }

    /// `Authorization` headers received by the address endpoint.
    #[must_use]
    pub fn authorizations(&self) -> Vec<String> {
        self.lock().recorded.authorizations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeUspsState> {
        self.state.lock().expect("fake USPS state poisoned")
    }
}

impl Drop for FakeUsps {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Address API body carrying a standardized address with the given ZIP parts.
#[must_use]
pub fn full_zip_reply(zip: &str, plus4: &str) -> Value {
    json!({
        "firm": null,
        "address": {
            "streetAddress": "1 MARKET ST",
            "streetAddressAbbreviation": null,
            "secondaryAddress": "STE 300",
            "city": "SAN FRANCISCO",
            "cityAbbreviation": "SF",
            "state": "CA",
            "ZIPCode": zip,
            "ZIPPlus4": plus4,
            "urbanization": null
        },
        "additionalInfo": null,
        "addressAdditionalInfo": {
            "deliveryPoint": "25",
            "carrierRoute": "C005",
            "DPVConfirmation": "Y",
            "DPVCMRA": "N",
            "business": "Y",
            "centralDeliveryPoint": "N",
            "vacant": "N"
        },
        "corrections": [],
        "matches": [{"code": "31", "text": "Single Response - exact match"}],
        "warnings": []
    })
}

/// Address API body with no ZIP+4, as USPS returns for a partial match.
#[must_use]
pub fn no_plus4_reply() -> Value {
    json!({
        "address": {
            "streetAddress": "1 MARKET ST",
            "city": "SAN FRANCISCO",
            "state": "CA",
            "ZIPCode": "94105"
        },
        "corrections": [{"code": "32", "text": "Default address: more information is needed"}]
    })
}

async fn token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("fake USPS state poisoned");
    state.recorded.token_requests.push(body);

    if let Some((status, text)) = state.token_failure.clone() {
        return (status, text).into_response();
    }

    Json(json!({
        "access_token": FAKE_ACCESS_TOKEN,
        "token_type": "Bearer",
        "issued_at": 1_760_000_000_000_i64,
        "expires_in": "28799",
        "status": "approved",
        "scope": "addresses",
        "issuer": "api.usps.com",
        "application_name": "zip4-test"
    }))
    .into_response()
}

async fn address(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().expect("fake USPS state poisoned");
    state.recorded.address_queries.push(params);
    if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state.recorded.authorizations.push(auth.to_string());
    }

    let (status, body) = state.address_reply.clone();
    (status, Json(body)).into_response()
}
