//! Test helpers module
//!
//! Mock servers for the remote mirror and the Telegram API, a write
//! counting backend and store setup shared by the integration tests.

#![allow(dead_code)]

pub mod counting_store;
pub mod remote_mock;
pub mod simple_test;
pub mod telegram_mock;

pub use counting_store::*;
pub use remote_mock::*;
pub use simple_test::*;
pub use telegram_mock::*;
