// Adapters layer: concrete implementations of the domain ports (http, html, auth, messaging).

pub mod activity;
pub mod auth;
pub mod clock;
pub mod html;
pub mod http;
