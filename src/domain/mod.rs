//! Domain aggregates exposed by the back-office service layer.

use std::fmt::Debug;

use crate::domain::types::RecordId;

pub mod client;
pub mod job;
pub mod payment;
pub mod stats;
pub mod types;

/// A record owned by the remote system and cached by one screen.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    /// Identifier assigned by the remote API.
    type Id: RecordId;
    /// Parent the collection is listed under (`()` for top-level records).
    type Scope: Clone + Debug + PartialEq + Send + Sync;
    /// Editable fields submitted on create and update.
    type Fields: Clone + Debug + Send + Sync;

    fn id(&self) -> &Self::Id;

    /// Builds a record carrying exactly `fields` under `id`.
    fn assemble(id: Self::Id, fields: Self::Fields) -> Self;

    /// Whether the record belongs to `scope`. Records that do not report a
    /// parent are assumed to be scoped by the API already.
    fn belongs_to(&self, scope: &Self::Scope) -> bool;
}
