//! Record shapes of the Merlinn records store.
//!
//! Field names follow the store's wire format (camelCase, `_id` for the
//! identifier). Records are normally produced through
//! [`SchemaRegistry`](crate::registry::SchemaRegistry), which reports every
//! offending field instead of stopping at the first serde error.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::schema::Entity;

/// A typed record shape registered under an [`Entity`].
pub trait Model: Serialize + DeserializeOwned {
    const ENTITY: Entity;
}

/// A record kept in its own table, carrying the shared identity.
pub trait Stored: Model {
    fn meta(&self) -> &RecordMeta;
}

macro_rules! stored_model {
    ($ty:ty, $entity:ident) => {
        impl $crate::models::Model for $ty {
            const ENTITY: $crate::schema::Entity = $crate::schema::Entity::$entity;
        }

        impl $crate::models::Stored for $ty {
            fn meta(&self) -> &$crate::models::RecordMeta {
                &self.meta
            }
        }
    };
}

pub(crate) use stored_model;

pub mod common;
pub mod index;
pub mod integration;
pub mod organization;
pub mod plan;
pub mod plan_field;
pub mod plan_state;
pub mod user;
pub mod vendor;

pub use common::{Mapping, ObjectId, RecordMeta, Ref};
