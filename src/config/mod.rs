//! Configuration reconciliation.
//!
//! # Data Flow
//! ```text
//! host addon info + platform
//!     → paths.rs (translate, platform quirks, scratch dir)
//!     → writable.rs (download/library directories)
//! host raw settings
//!     → coerce.rs (native values, read through schema.rs)
//!     → derive.rs (memory budget, proxy URL, resolvers, defaults)
//!     → Configuration (immutable)
//!     → store.rs (swap of Arc<Configuration>)
//! ```

pub mod coerce;
pub mod derive;
pub mod dns;
pub mod error;
pub mod memory;
pub mod paths;
pub mod reconciler;
pub mod schema;
pub mod store;
pub mod types;
pub mod writable;

pub use coerce::{coerce, SettingValue, TypedSettings};
pub use dns::{DnsResolvers, Resolver, ResolverCategory};
pub use error::{ConfigError, ReloadError};
pub use memory::{FixedMemory, MemoryProbe, SystemMemory};
pub use paths::QuirkContext;
pub use reconciler::{ConfigurationReconciler, ReloadPhase};
pub use schema::{Setting, SettingKind};
pub use store::ConfigStore;
pub use types::{Configuration, SecureString, LISTEN_PORT};
pub use writable::check_writable;
