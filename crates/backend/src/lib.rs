//! Reference CRUD server for the storefront admin collections.
//!
//! Serves `/api/{collection}` for every entity kind over an in-memory store.

pub mod handlers;
pub mod routes;
pub mod shared;
