pub mod dispatch;
pub mod granularity;
pub mod resolve;
