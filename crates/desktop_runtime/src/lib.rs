//! Desktop window and session manager.
//!
//! The crate owns the authoritative model of installed applications, their windows, and the
//! session settings. State changes go through [`reduce_desktop`], which returns
//! [`RuntimeEffect`] intents (persistence, style application, notifications) that the
//! [`DesktopContext`] executes against the injected [`platform_host::HostServices`].

pub mod apps;
pub mod bus;
pub mod config;
pub mod effect_executor;
pub mod host;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod window_manager;

pub use apps::{AppDescriptor, AppRegistry, RegistryError};
pub use bus::{BusEvent, HandlerResult, NotificationBus, SubscriptionId};
pub use config::{ConfigError, ConfigLoader, DesktopConfig};
pub use host::host_services_for;
pub use model::*;
pub use persistence::PersistedSession;
pub use reducer::{compute_style_table, reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::DesktopContext;
