//! Secret-aware template rendering.
//!
//! This crate binds a [`SecretResolver`] into a MiniJinja template so that
//! configuration files can be generated with credentials looked up at render
//! time instead of being committed in plain text.
//!
//! # Template syntax
//!
//! Templates use MiniJinja (Jinja2) syntax. The resolver is reachable under the
//! reserved name `vault`, either as a function or as a filter:
//!
//! ```text
//! DATABASE_PASSWORD={{ vault("secret/data/db#password") }}
//! API_KEY={{ "secret/data/api#key" | vault }}
//! {% for svc in ["billing", "search"] %}
//! {{ svc | upper }}_TOKEN={{ vault("secret/data/" ~ svc ~ "#token") }}
//! {% endfor %}
//! ```
//!
//! The `minijinja-contrib` helpers and Python-style methods are available
//! alongside the builtin filters.
//!
//! # Guarantees
//!
//! - Rendering is all-or-nothing; no partial output is ever returned.
//! - Templates that do not parse, or that read an unknown name, fail before
//!   any secret is looked up.
//! - Lookups run synchronously in execution order, once per call site
//!   evaluation, without caching or retries.
//! - Secret values are inserted verbatim, with no escaping.

mod error;
pub mod namespace;
mod render;
mod resolver;

pub use error::{ParseError, RenderError};
pub use namespace::{HelperInstaller, SECRET_FUNCTION};
pub use render::{TemplateRenderer, render};
pub use resolver::{SecretError, SecretResolver};
