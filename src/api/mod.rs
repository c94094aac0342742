pub mod balance;
pub mod desired_months;
pub mod leave;
