pub mod claim;
pub mod crew;
pub mod otp;
pub mod payment;
