pub mod graphite;
pub mod null;
