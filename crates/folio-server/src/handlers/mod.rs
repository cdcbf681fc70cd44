//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod contact;
pub(crate) mod pages;
pub(crate) mod posts;
