//! Portal engine: HTTP access to the collection service and effect execution.
mod client;
mod confirm;
mod engine;
mod render;
mod schema;
mod types;

pub use client::{ClientSettings, CredentialsMode, Remote, ReqwestRemote};
pub use confirm::{Confirmer, StaticConfirmer};
pub use engine::EngineHandle;
pub use render::{ContentRenderer, Html2MdRenderer};
pub use schema::{decode_collection, decode_item, encode_draft};
pub use types::{EngineEvent, FailureKind, RemoteError};
