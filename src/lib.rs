//! Crowdfunding payment and withdrawal backend
//!
//! Opens gateway charges for donations, settles them from signed webhooks or
//! client verification, and drives creator withdrawals through admin approval
//! and bank transfer.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod payments;
pub mod services;
