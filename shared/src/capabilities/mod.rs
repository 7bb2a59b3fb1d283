mod documents;
mod identity;
mod kv;

pub use self::documents::{
    CollectionPath, Document, DocumentError, DocumentOperation, DocumentOutput, DocumentResult,
    Documents, SubscriptionId,
};
pub use self::identity::{
    Identity, IdentityError, IdentityOperation, IdentityOutput, IdentityResult,
};
pub use self::kv::{decode_bool, encode_bool, KeyError, PreferenceKey, StorageHandle};

pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub identity: Identity<Event>,
    pub documents: Documents<Event>,
    pub key_value: KeyValue<Event>,
}
