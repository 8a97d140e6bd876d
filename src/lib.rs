//! # srcon
//!
//! A client for the Source RCON protocol: length-prefixed binary frames
//! over TCP, used to run administrative commands against a game server.
//!
//! - Little-endian wire codec with the mandatory double null terminator
//! - Two-reply authentication handshake with the `-1` failure sentinel
//! - Multi-packet response reassembly via the mirror-packet technique
//! - Half-duplex sessions safe to share between threads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller(s)                             │
//! │              exec_command("status") / close()                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  serialized by the session mutex
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Session                               │
//! │      lazy connect → lazy authenticate → exec protocol        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │  TcpStream  │
//!   │ (pure, LE)  │          │ (one/sess.) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use srcon::{Options, Session};
//!
//! let options = Options::builder()
//!     .host("127.0.0.1")
//!     .port(27015)
//!     .password("hunter2")
//!     .build();
//!
//! let session = Session::new(options);
//! let output = session.exec_command("status")?;
//! println!("{}", String::from_utf8_lossy(&output));
//! session.close()?;
//! # Ok::<(), srcon::RconError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::Options;
pub use session::Session;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of srcon
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
