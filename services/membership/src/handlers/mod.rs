pub mod claim;
pub mod crew;
pub mod identity;
pub mod otp;
pub mod payment;
