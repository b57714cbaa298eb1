pub mod booking_rules;
pub mod municipalities;
pub mod status_policy;
