pub mod cache;
pub mod lender;
