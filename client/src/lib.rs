//! # MedBox Sync
//!
//! Keeps a [`medbox_engine::Store`] consistent across three places:
//!
//! - the in-memory store of the running [`Session`],
//! - a local snapshot on the device ([`SnapshotCache`]), written on every
//!   mutation so the app boots instantly, and
//! - one shared JSON document ([`RemoteDocument`]) read once at sign-in and
//!   overwritten, debounced, after edits.
//!
//! The remote side is a single-active-editor design: there is no locking and
//! no merge. Whoever pushes last wins.
//!
//! ## Example
//!
//! ```no_run
//! use medbox_sync::{FileCache, HttpRemote, Session, StaticTokenProvider, SyncConfig};
//! use medbox_engine::NewRecord;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::load()?;
//! let mut session = Session::open(
//!     &config,
//!     FileCache::new(&config.cache_dir),
//!     HttpRemote::from_config(&config)?,
//!     StaticTokenProvider::from_config(&config),
//! )?;
//!
//! session.sign_in().await;
//! session.add_record(NewRecord::new("Ibuprofen").qty(20).low(5));
//! println!("{}", session.current_status());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod remote;
pub mod session;
pub mod status;
pub mod sync;

pub use auth::{
    AccessToken, AuthError, AuthGate, IdentityProvider, StaticTokenProvider,
    TokenExchangeProvider,
};
pub use cache::{FileCache, MemoryCache, SnapshotCache};
pub use config::{ConfigError, SyncConfig};
pub use debounce::Debouncer;
pub use error::{Result, SyncError};
pub use remote::{HttpRemote, RemoteDocument};
pub use session::Session;
pub use status::SyncStatus;
pub use sync::RemoteSync;
