use std::sync::Arc;

use crate::core::client::cancel::CancelSignal;
use crate::core::client::monitor_client::RequestSender;
use crate::domain::monitor::service::query_service::QueryService;

macro_rules! delegate_async_service {
    ($(fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty => $path:path;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> anyhow::Result<$ret> {
                $path($($arg),*).await
            }
        )+
    };
}

#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    pub system_service: Arc<SystemService>,
}

/// `shutdown` is handed to every query run so in-flight requests stop when the server drains.
pub fn build_app_state(
    sender: Arc<dyn RequestSender>,
    default_subscription: String,
    shutdown: CancelSignal,
) -> AppState {
    AppState {
        query_service: Arc::new(QueryService::new(sender, default_subscription, shutdown)),
        system_service: Arc::new(SystemService),
    }
}

#[derive(Clone, Default)]
pub struct SystemService;

impl SystemService {
    delegate_async_service! {
        fn health() -> serde_json::Value => crate::domain::system::service::health_service::health;
    }
}
