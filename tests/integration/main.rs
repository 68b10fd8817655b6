//! Integration test harness.
//!
//! These tests exercise the pipeline against a live PostgreSQL database
//! and are `#[ignore]`d by default. To run them, point `DATABASE_URL` at
//! a disposable database and use a single test thread (the suite shares
//! tables and truncates between tests):
//!
//! ```text
//! DATABASE_URL=postgres://localhost/miniblog_test \
//!     cargo test --test integration -- --ignored --test-threads=1
//! ```

mod helpers;
mod listing_test;
mod notification_test;
mod publish_flow_test;
