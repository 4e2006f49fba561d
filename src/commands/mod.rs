//! Command implementations.

mod common;
mod topic_urls;

pub use topic_urls::{
    Delivery,
    OutputFormat,
    Report,
    TopicUrlsArgs,
    deliver,
    gather,
    topic_urls,
};
