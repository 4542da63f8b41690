//! CLI Exit Code Registry
//!
//! Single source of truth for all exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Range | Domain    | Description                               |
//! |-------|-----------|-------------------------------------------|
//! | 0     | Universal | Success                                   |
//! | 1     | Universal | General error (unspecified)               |
//! | 2     | Universal | CLI usage error (bad args, missing file)  |
//! | 3-9   | Local     | Input / config problems                   |
//! | 10-19 | Sync      | Remote store failures during the run      |

/// Success - run completed (warnings may still have been printed).
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file unreadable or unparseable.
pub const EXIT_INPUT: u8 = 3;

/// Mapping config missing or invalid.
pub const EXIT_CONFIG: u8 = 4;

/// Store rejected the API key (401/403).
pub const EXIT_SYNC_AUTH: u8 = 10;

/// Store returned a non-success status on lookup or write.
pub const EXIT_SYNC_UPSTREAM: u8 = 11;

/// Identifier allocator call failed; nothing can be created.
pub const EXIT_SYNC_ALLOC: u8 = 12;

/// Transport-level failure (DNS, TLS, connection, timeout).
pub const EXIT_SYNC_NETWORK: u8 = 13;

/// Store response had an unexpected shape.
pub const EXIT_SYNC_PROTOCOL: u8 = 14;
