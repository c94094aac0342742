pub mod calendar;
pub mod desired_months;
pub mod error;
pub mod ledger;
pub mod validation;
pub mod workflow;
