//! Safety updates domain - externally published items analyzed through the cache

mod feed;
mod item;

pub use feed::{ArticleFetcher, UpdateFeed};
pub use item::{
    AnalyzedUpdate, UpdateItem, ARTICLE_PARAGRAPH_LIMIT, NO_ARTICLE_TEXT, UNREACHABLE_ARTICLE_TEXT,
};

#[cfg(test)]
pub use feed::mock::{MockArticleFetcher, MockUpdateFeed};
