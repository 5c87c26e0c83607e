//! Client-side state layer of the storefront admin.
//!
//! One [`Controller`](shared::controller::Controller) per management page
//! owns the collection of one entity kind and talks to the store through a
//! [`Gateway`](shared::gateway::Gateway). Filtering, delete confirmation and
//! form drafts are layered on top without ever mutating the collection
//! directly. Rendering is left to the embedding UI.

pub mod domain;
pub mod shared;
