//! Process exit codes owned by the binaries.
//! Domain errors carry their own code (`IngestError::exit_code`,
//! `RegistryError::exit_code`, 2 and up); these cover everything outside them.

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 1; // Logging or runtime setup failed
