//! Recipe service: URL validation, fetching, and extraction in one call.

use std::sync::Arc;

use tracing::{info, instrument};
use url::Url;

use crate::error::{Error, Result};
use crate::extraction::{PipelineOutput, RecipePipeline};
use crate::fetch::{FetchConfig, HtmlFetcher, HttpFetcher};

/// Validate that `raw` is an absolute http(s) URL.
pub fn validate_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(Error::InvalidUrl(format!(
            "unsupported scheme '{}' in {}",
            other, raw
        ))),
    }
}

/// Fetches pages and runs them through the extraction pipeline
#[derive(Clone)]
pub struct RecipeService {
    fetcher: Arc<dyn HtmlFetcher>,
    pipeline: Arc<RecipePipeline>,
}

impl RecipeService {
    /// Service with an HTTP fetcher and the standard pipeline.
    pub fn new(fetch: &FetchConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(fetch)?;
        Ok(Self::with_parts(Arc::new(fetcher), Arc::new(RecipePipeline::new()?)))
    }

    /// Service from explicit parts.
    pub fn with_parts(fetcher: Arc<dyn HtmlFetcher>, pipeline: Arc<RecipePipeline>) -> Self {
        Self { fetcher, pipeline }
    }

    /// The extraction pipeline in use.
    pub fn pipeline(&self) -> &RecipePipeline {
        &self.pipeline
    }

    /// Validate, fetch and extract the recipe at `url`.
    #[instrument(skip(self))]
    pub async fn parse_url(&self, url: &str) -> Result<PipelineOutput> {
        let parsed = validate_url(url)?;
        let html = self.fetcher.fetch(parsed.as_str()).await?;
        info!("Fetched {} ({} bytes)", parsed, html.len());
        self.parse_html(&html, url)
    }

    /// Extract a recipe from HTML that has already been fetched.
    pub fn parse_html(&self, html: &str, url: &str) -> Result<PipelineOutput> {
        self.pipeline.run(html, url)
    }
}

impl std::fmt::Debug for RecipeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeService")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, FetchError};
    use crate::extraction::ExtractionLayer;
    use futures::future::BoxFuture;

    struct StaticFetcher(std::result::Result<&'static str, u16>);

    impl HtmlFetcher for StaticFetcher {
        fn fetch<'a>(
            &'a self,
            _url: &'a str,
        ) -> BoxFuture<'a, std::result::Result<String, FetchError>> {
            let result = match self.0 {
                Ok(html) => Ok(html.to_string()),
                Err(status) => Err(FetchError::from_status(status)
                    .unwrap_or(FetchError::Network("unexpected".to_string()))),
            };
            Box::pin(async move { result })
        }
    }

    fn service(result: std::result::Result<&'static str, u16>) -> RecipeService {
        RecipeService::with_parts(
            Arc::new(StaticFetcher(result)),
            Arc::new(RecipePipeline::new().unwrap()),
        )
    }

    const LD_PAGE: &str = r#"<html><head><script type="application/ld+json">
        {"@type":"Recipe","name":"Toast","recipeIngredient":["bread"],"recipeInstructions":["Toast it."]}
    </script></head><body></body></html>"#;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/recipe").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        assert!(matches!(validate_url("ftp://example.com"), Err(Error::InvalidUrl(_))));
        assert!(matches!(validate_url("not a url"), Err(Error::InvalidUrl(_))));
        assert!(matches!(validate_url(""), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_url_success() {
        let out = tokio_test::block_on(service(Ok(LD_PAGE)).parse_url("https://example.com/toast"))
            .unwrap();
        assert_eq!(out.layer, ExtractionLayer::JsonLd);
        assert_eq!(out.recipe.title, "Toast");
        assert_eq!(out.recipe.url, "https://example.com/toast");
    }

    #[test]
    fn test_parse_url_fetch_error_propagates() {
        let err = tokio_test::block_on(service(Err(429)).parse_url("https://example.com")).unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::RateLimited)));
    }

    #[test]
    fn test_parse_url_rejects_before_fetch() {
        let err = tokio_test::block_on(service(Ok(LD_PAGE)).parse_url("file:///etc/passwd"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_html_no_data() {
        let err = service(Ok(""))
            .parse_html("<html><body><h1></h1></body></html>", "https://example.com")
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(ExtractionError::NoRecipeData)));
    }
}
