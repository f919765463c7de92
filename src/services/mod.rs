//! Aggregation core. Everything here is synchronous and works on an
//! in-memory list already scoped to one user.

pub mod canonical;
pub mod clock;
pub mod quotes;
pub mod rolling;
pub mod sample_data;
pub mod today;
pub mod trend;
