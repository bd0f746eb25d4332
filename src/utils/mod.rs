pub mod datetime;

pub use datetime::parse_end_time;
