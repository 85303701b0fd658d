//! Test helpers for tenet-server.

#![allow(dead_code, unused_imports)]

pub mod client;

pub use client::{TENANT, TestClient, TestResponse, app, client, client_with};
