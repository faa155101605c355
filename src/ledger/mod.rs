//! Reference implementation of the external collaborators.
//!
//! [`InMemoryLedger`] implements both [`AssetLedger`](crate::traits::AssetLedger)
//! and [`NativeWrapper`](crate::traits::NativeWrapper) over hash maps.  It
//! backs the test suites and is a convenient harness for simulations.

mod in_memory;

pub use in_memory::InMemoryLedger;
