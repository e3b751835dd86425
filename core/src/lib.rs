//! Blocking, typed client for the Trello REST API.
//!
//! # Overview
//! Every remote resource (boards, lists, cards, checklists, labels, members,
//! organizations, notifications, tokens, webhooks, actions) and its
//! sub-resources map to a typed API that builds requests, validates
//! parameters before anything is sent, and returns decoded JSON. Domain
//! objects layer a load/save/refresh/remove lifecycle with hook slots on top.
//!
//! # Design
//! - Requests and responses are plain values (`HttpRequest`,
//!   `HttpResponse`). The `Transport` trait executes them; `UreqTransport`
//!   does real I/O and `MockTransport` replays scripted responses, so every
//!   layer above is testable without a network.
//! - `HttpClient` owns the transport, default headers and the auth stage,
//!   and translates error statuses into `TrelloError`.
//! - Resources are `static` descriptors; `ResourceApi` pairs one with a
//!   borrowed `HttpClient` and is `Copy`.
//! - Nothing retries, caches or paginates. The library installs no tracing
//!   subscriber.
//!
//! ```no_run
//! use trello_core::{AuthMethod, Client, ClientConfig, Params};
//!
//! # fn main() -> trello_core::Result<()> {
//! let mut client = Client::new(ClientConfig::default())?;
//! client.authenticate(AuthMethod::UrlClientId {
//!     client_id: "app-key".into(),
//!     token: "user-token".into(),
//! });
//! let boards = client.members().boards().filter("me", "open")?;
//! let mut card = client.manager().card(None)?;
//! card.set_name("Write release notes")?.set_list_id("5f1c0c0e8a4b2d3e4f5a6b7c")?;
//! card.save()?;
//! # let _ = (boards, Params::new());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod http_client;
pub mod manager;
pub mod middleware;
pub mod mock;
pub mod model;
pub mod oauth;
pub mod params;
pub mod registry;
pub mod resource;
pub mod resources;
pub mod transport;

pub use client::Client;
pub use config::{AuthOptions, ClientConfig};
pub use error::{Result, TrelloError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use http_client::{HttpClient, RequestOptions};
pub use manager::Manager;
pub use middleware::AuthMethod;
pub use mock::MockTransport;
pub use model::{DomainObject, Hook, ObjectState};
pub use oauth::Credentials;
pub use params::{ParamValue, Params};
pub use registry::ResourceKind;
pub use resource::{ResourceApi, ResourceDescriptor};
pub use transport::{Transport, UreqTransport};
