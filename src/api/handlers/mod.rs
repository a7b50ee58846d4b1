//! Route handlers for the gateway and the page shells it serves.

pub mod auth_proxy;
pub mod booklets;
pub mod hello;
pub mod pages;
