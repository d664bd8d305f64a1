//! # State Module
//!
//! Focused state objects built once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │  SessionState    │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Session +       │  │  store_name      │          │
//! │  │  (SQLite     │  │  SessionStore    │  │  currency        │          │
//! │  │   pool)      │  │  (session.json)  │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  Each command takes only the state it needs. The session is passed     │
//! │  by reference; nothing is global.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod session;

pub use config::ConfigState;
pub use db::DbState;
pub use session::SessionState;
