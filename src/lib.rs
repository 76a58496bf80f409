//! quotevault
//!
//! The reconcilable core of a quote manager: a persisted quote store, a
//! derived category index, and a periodic sync reconciler that merges a
//! remote snapshot remote-wins while preserving local-only quotes.

pub mod app;
pub mod storage;
pub mod store;
pub mod sync;
pub mod types;

pub use app::App;
pub use store::QuoteStore;
pub use sync::SyncReconciler;
pub use types::Quote;

/// Initialize tracing with an env-filter (RUST_LOG), defaulting to info
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
