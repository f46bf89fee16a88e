//! Gateway implementations of [`crate::payments::PaymentProvider`]

pub mod paystack;

pub use paystack::PaystackProvider;
