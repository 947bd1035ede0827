//! Simulated grocery storefront session: a product catalog whose prices drop
//! on a timer, a notification feed for those drops, a persisted cart, a
//! checkout flow with a simulated payment step, and a distance-sorted store
//! locator.
//!
//! All session state lives in one [`actors::StorefrontService`] task and is
//! reached through the cloneable [`clients::StorefrontClient`].

pub mod actors;
pub mod app_system;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod locator;
pub mod messages;
pub mod navigator;
pub mod notifications;
pub mod simulator;

#[cfg(test)]
mod mock_framework;
