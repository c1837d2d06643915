//! Update feed and article adapters

mod article;
mod rss;

pub use article::HtmlArticleFetcher;
pub use rss::{parse_rss_items, RssUpdateFeed};
