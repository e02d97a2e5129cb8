//! Client-side list controllers for the donor platform admin console.
//!
//! Each list fetches a whole collection from the REST backend, then
//! filters, sorts and paginates it locally. See
//! [`services::list::ResourceListController`].

pub mod domain;
pub mod dto;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;
pub mod sort;
