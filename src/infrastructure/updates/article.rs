//! Article text extraction

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::domain::{ArticleFetcher, RagError};
use crate::infrastructure::llm::HttpClientTrait;

/// Downloads a page and returns the text of its `<p>` elements
#[derive(Debug)]
pub struct HtmlArticleFetcher<C: HttpClientTrait> {
    client: C,
}

impl<C: HttpClientTrait> HtmlArticleFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    fn extract_paragraphs(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("p") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect()
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl<C: HttpClientTrait> ArticleFetcher for HtmlArticleFetcher<C> {
    async fn paragraphs(&self, link: &str) -> Result<Vec<String>, RagError> {
        let html = self
            .client
            .get_text(link)
            .await
            .map_err(|e| RagError::upstream(format!("article {}: {}", link, e)))?;

        Ok(Self::extract_paragraphs(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const PAGE: &str = r#"<html>
<head><title>Circular</title><style>p { color: red; }</style></head>
<body>
  <div><p>First   paragraph
     spans lines.</p></div>
  <p>Second with <b>bold</b> text.</p>
  <p>   </p>
  <script>var p = "<p>not a paragraph</p>";</script>
</body>
</html>"#;

    #[tokio::test]
    async fn test_paragraphs_in_document_order() {
        let fetcher = HtmlArticleFetcher::new(
            MockHttpClient::new().with_page("https://dgms.example/c12", PAGE),
        );

        let paragraphs = fetcher.paragraphs("https://dgms.example/c12").await.unwrap();

        assert_eq!(
            paragraphs,
            vec!["First paragraph spans lines.", "Second with bold text."]
        );
    }

    #[tokio::test]
    async fn test_page_without_paragraphs() {
        let fetcher = HtmlArticleFetcher::new(
            MockHttpClient::new().with_page("https://dgms.example/pdf", "<html><body>scan</body></html>"),
        );

        assert!(fetcher.paragraphs("https://dgms.example/pdf").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_page_is_upstream_unavailable() {
        let fetcher = HtmlArticleFetcher::new(MockHttpClient::new());

        let error = fetcher.paragraphs("https://dgms.example/missing").await.unwrap_err();
        assert_eq!(error.kind(), "upstream_unavailable");
    }
}
