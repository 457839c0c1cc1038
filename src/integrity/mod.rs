//! Referential-integrity enforcement.
//!
//! [`refs`] checks that reference fields on device and reading payloads
//! point at existing (and, for readings, active) records before a write
//! commits. [`guard`] blocks deletion of records that still have dependents.
//! Both are invoked explicitly by the handlers; the store performs no
//! implicit reference checking of its own.

pub mod guard;
pub mod refs;
