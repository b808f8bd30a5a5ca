pub mod aggregator;
pub mod collection;
pub mod compression;
pub mod constants;
pub mod cursor;
pub mod decoders;
pub mod error;
pub mod file_type;
pub mod fixed_point;
pub mod format;
pub mod header;
pub mod mac;
pub mod statistics;
