//! sea-orm entities for the membership service.

pub mod app_settings;
pub mod claims;
pub mod crew_members;
pub mod job_titles;
pub mod otp_challenges;
pub mod payments;
pub mod profiles;
pub mod region_sequences;
pub mod regions;
