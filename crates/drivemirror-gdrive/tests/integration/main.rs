//! Integration tests for drivemirror-gdrive
//!
//! Uses wiremock to simulate the Drive v3 API and verifies end-to-end
//! behavior of the DriveClient, the remote-store adapter, and the core use
//! cases running on top of it.

mod common;

mod test_listing;
mod test_remote_store;
mod test_transfers;
