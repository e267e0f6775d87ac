//! Fitness profile client: credential login/signup, a profile document per
//! user and a progress-photo gallery stored as data-URL strings.
//!
//! ARCHITECTURE
//! ============
//! The identity provider and the document store are external services
//! reached through traits ([`identity::IdentityProvider`],
//! [`store::DocumentStore`]), with hosted REST clients and in-process
//! implementations of each. Controllers ([`auth::AuthFlow`],
//! [`profile::ProfileStore`], [`gallery::GalleryManager`]) are explicit
//! instances built from those handles, and [`events::App`] routes page events
//! onto them through a [`ui::Surface`].

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod gallery;
pub mod identity;
pub mod payload;
pub mod profile;
pub mod store;
pub mod ui;

#[cfg(test)]
mod test_helpers;
