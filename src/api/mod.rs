//! Backend API facade and its request/response types.

mod client;
mod types;

pub use client::KgApi;
pub use types::{
    CausePath, CausePathParams, DictionaryEntry, DictionaryQuery, FlowItem, FlowQueryParams,
    PathNode, PathRelation,
};
