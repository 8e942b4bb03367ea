//! Composable handlers for the micro gemini server.
//!
//! - [`FileServer`]: serves a directory, sniffing media types from file contents
//! - [`StripPrefix`]: mounts any handler under a sub-path
//!
//! ```no_run
//! use micro_gemini::router::Router;
//! use micro_gemini_web::{file_server, strip_prefix};
//!
//! let router = Router::builder()
//!     .handle("/static", strip_prefix("/static", file_server("./public")))
//!     .build();
//! # let _ = router;
//! ```

mod file_server;
mod strip_prefix;

pub use file_server::FileServer;
pub use file_server::INDEX_FILE;
pub use file_server::SNIFF_LEN;
pub use file_server::file_server;
pub use strip_prefix::StripPrefix;
pub use strip_prefix::strip_prefix;
