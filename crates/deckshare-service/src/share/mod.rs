//! Share-link lifecycle: create, name, list, resolve and revoke links.

pub mod link;
pub mod service;

pub use link::generate_link_token;
pub use service::ShareLinkService;
