//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP transport,
//! settings storage, router, notifier) into one [`SessionStore`] shared by the
//! warehouse and delivery [`Gateway`]s, and exposes typed wrappers for the
//! endpoints the admin console uses. Desktop hosts typically enable the
//! `desktop-shims` feature (which depends on `bridge-desktop`) and call
//! [`bootstrap_desktop`].

pub mod aftersales;
pub mod auth;
pub mod delivery;
pub mod drivers;
pub mod error;
pub mod inventory;
pub mod inventory_logs;
pub mod orders;
pub mod sales;
pub mod users;

pub use aftersales::{AftersaleItem, AftersalesApi, NewAftersale};
pub use auth::{AuthApi, LoginRequest, RegisterRequest, ResetPasswordRequest};
pub use delivery::{DeliveryApi, DeliveryQuery, DispatchRequest};
pub use drivers::{DriverAudit, DriverQuery, DriversApi};
pub use error::{Result, ServiceError};
pub use inventory::{InventoryApi, InventoryItem, InventoryQuery};
pub use inventory_logs::{InboundLog, InventoryLogChange, InventoryLogsApi, LogQuery, TransferLog};
pub use orders::{NewOrder, NewOrderItem, OrderChange, OrderItemChange, OrderQuery, OrdersApi};
pub use sales::SalesApi;
pub use users::{Page, Upload, UserChange, UsersApi};

pub use core_gateway::{ErrorKind, Gateway, GatewayError, MultipartForm, RequestOptions};
pub use core_runtime::config::{GatewayConfig, SessionKeys};
pub use core_runtime::events::{CoreEvent, EventBus, EventStream};
pub use core_session::{SessionStore, UserProfile};

use std::sync::Arc;

use bridge_traits::{
    http::HttpClient,
    storage::SettingsStore,
    ui::{Navigator, Notifier},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Sort direction accepted by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub settings_store: Arc<dyn SettingsStore>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub event_bus: EventBus,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        settings_store: Arc<dyn SettingsStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            http_client,
            settings_store,
            navigator,
            notifier,
            event_bus: EventBus::default(),
        }
    }

    /// Publish session and gateway events on `bus` instead of a private one.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = bus;
        self
    }
}

/// Backends and storage layout for one console deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub warehouse: GatewayConfig,
    pub delivery: GatewayConfig,
    #[serde(default)]
    pub session_keys: SessionKeys,
}

impl ServiceConfig {
    /// Preset gateways for the two backends with default storage keys.
    pub fn new(
        warehouse_base_url: impl Into<String>,
        delivery_base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            warehouse: GatewayConfig::warehouse(warehouse_base_url)?,
            delivery: GatewayConfig::delivery(delivery_base_url)?,
            session_keys: SessionKeys::default(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.warehouse.validate()?;
        self.delivery.validate()?;
        self.session_keys.validate()?;
        if self.warehouse.name == self.delivery.name {
            return Err(ServiceError::Config(core_runtime::Error::Config(format!(
                "Gateways must have distinct names, both are '{}'",
                self.warehouse.name
            ))));
        }
        Ok(())
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct AdminCore {
    session: Arc<SessionStore>,
    warehouse: Gateway,
    delivery: Gateway,
    event_bus: EventBus,
}

impl AdminCore {
    /// Build the shared session and both gateways.
    ///
    /// The session is rehydrated from the settings store before any gateway is
    /// created, so the first request already carries a persisted credential.
    pub async fn new(deps: CoreDependencies, config: ServiceConfig) -> Result<Self> {
        config.validate()?;

        let session = SessionStore::load(deps.settings_store, config.session_keys)
            .await?
            .with_event_bus(deps.event_bus.clone());
        let session = Arc::new(session);

        let build = |gateway: GatewayConfig| {
            Gateway::new(
                gateway,
                Arc::clone(&deps.http_client),
                Arc::clone(&session),
                Arc::clone(&deps.navigator),
                Arc::clone(&deps.notifier),
            )
            .with_event_bus(deps.event_bus.clone())
        };
        let warehouse = build(config.warehouse);
        let delivery = build(config.delivery);

        info!(
            warehouse = %warehouse.config().base_url,
            delivery = %delivery.config().base_url,
            signed_in = session.token().is_some(),
            "Admin core initialized"
        );

        Ok(Self {
            session,
            warehouse,
            delivery,
            event_bus: deps.event_bus,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn warehouse(&self) -> &Gateway {
        &self.warehouse
    }

    pub fn delivery(&self) -> &Gateway {
        &self.delivery
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to session, gateway and navigation events.
    pub fn events(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.warehouse.clone(), Arc::clone(&self.session))
    }

    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(self.warehouse.clone())
    }

    pub fn inventory(&self) -> InventoryApi {
        InventoryApi::new(self.warehouse.clone())
    }

    pub fn inventory_logs(&self) -> InventoryLogsApi {
        InventoryLogsApi::new(self.warehouse.clone())
    }

    pub fn aftersales(&self) -> AftersalesApi {
        AftersalesApi::new(self.warehouse.clone())
    }

    pub fn sales(&self) -> SalesApi {
        SalesApi::new(self.warehouse.clone())
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.warehouse.clone())
    }

    /// Order dispatch. These endpoints live on the warehouse backend; the
    /// delivery backend is reached through [`drivers`](Self::drivers).
    pub fn dispatch(&self) -> DeliveryApi {
        DeliveryApi::new(self.warehouse.clone())
    }

    pub fn drivers(&self) -> DriversApi {
        DriversApi::new(self.delivery.clone())
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Uses reqwest for transport, a SQLite file for the session and notices
/// logged through `tracing`. Navigation requests are published on the returned
/// core's event bus as [`core_runtime::events::NavigationEvent::Requested`].
///
/// ```ignore
/// use core_service::{bootstrap_desktop, ServiceConfig};
///
/// let config = ServiceConfig::new("http://localhost:8081/api", "http://localhost:8080")?;
/// let core = bootstrap_desktop(config, "depot-admin/settings.db".into()).await?;
/// let orders = core.orders().list(&Default::default()).await?;
/// ```
#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub async fn bootstrap_desktop(
    config: ServiceConfig,
    settings_path: std::path::PathBuf,
) -> Result<AdminCore> {
    use bridge_desktop::{ReqwestHttpClient, SqliteSettingsStore, TracingNotifier};
    use core_runtime::events::EventNavigator;

    let http_client = ReqwestHttpClient::new()
        .map_err(|err| ServiceError::InitializationFailed(err.to_string()))?;
    let settings = SqliteSettingsStore::new(settings_path)
        .await
        .map_err(|err| ServiceError::InitializationFailed(err.to_string()))?;

    let event_bus = EventBus::default();
    let deps = CoreDependencies::new(
        Arc::new(http_client),
        Arc::new(settings),
        Arc::new(EventNavigator::new(event_bus.clone())),
        Arc::new(TracingNotifier::new()),
    )
    .with_event_bus(event_bus);

    AdminCore::new(deps, config).await
}
