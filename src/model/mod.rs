pub mod desired_months;
pub mod holiday;
pub mod leave_application;
pub mod leave_balance;
pub mod leave_type;
pub mod role;
pub mod user;
