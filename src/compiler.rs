use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::bundler::{BundleError, Bundler};
use crate::document::assemble_document;
use crate::extract::extract_first_code_block;
use crate::generator::PlaceholderGenerator;
use crate::models::Mode;

#[derive(Debug, Error)]
pub enum CompileError {
    // Covers both a failed completion call and model output with no usable
    // code block; extraction is part of getting usable generated code.
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("bundling failed: {0}")]
    Bundle(#[from] BundleError),
}

/// Sequences generator → extractor → bundler → assembler. Fail-fast, no
/// retries, no partial output: the first failing stage aborts the request.
#[derive(Clone)]
pub struct CompilerService {
    generator: Arc<dyn PlaceholderGenerator>,
    bundler: Arc<dyn Bundler>,
}

impl CompilerService {
    pub fn new(generator: Arc<dyn PlaceholderGenerator>, bundler: Arc<dyn Bundler>) -> Self {
        Self { generator, bundler }
    }

    pub async fn compile(
        &self,
        payload: &str,
        mode: Mode,
        api_key: &str,
    ) -> Result<String, CompileError> {
        let generated = self
            .generator
            .generate_placeholder(payload, mode, api_key)
            .await
            .map_err(|e| CompileError::Generation(e.to_string()))?;

        let source = extract_first_code_block(&generated)
            .map_err(|e| CompileError::Generation(e.to_string()))?;
        info!("Extracted {} bytes of placeholder source", source.len());

        // An empty script is a degraded result, not a failure; only a raised
        // bundler error aborts the request.
        let script = self.bundler.bundle(&source).await?;
        if script.is_empty() {
            info!("Bundler produced no output, returning a document with an empty script");
        }

        Ok(assemble_document(&script))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::document::REACT_CDN;
    use crate::generator::CompletionError;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl PlaceholderGenerator for FixedGenerator {
        async fn generate_placeholder(
            &self,
            _payload: &str,
            _mode: Mode,
            _api_key: &str,
        ) -> Result<String, CompletionError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl PlaceholderGenerator for FailingGenerator {
        async fn generate_placeholder(
            &self,
            _payload: &str,
            _mode: Mode,
            _api_key: &str,
        ) -> Result<String, CompletionError> {
            Err(CompletionError::Http("connection refused".to_string()))
        }
    }

    struct EchoBundler;

    #[async_trait]
    impl Bundler for EchoBundler {
        async fn bundle(&self, source: &str) -> Result<String, BundleError> {
            Ok(source.to_string())
        }
    }

    struct EmptyBundler;

    #[async_trait]
    impl Bundler for EmptyBundler {
        async fn bundle(&self, _source: &str) -> Result<String, BundleError> {
            Ok(String::new())
        }
    }

    struct BrokenBundler;

    #[async_trait]
    impl Bundler for BrokenBundler {
        async fn bundle(&self, _source: &str) -> Result<String, BundleError> {
            Err(BundleError::Io(std::io::Error::other("spawn failed")))
        }
    }

    fn service(
        generator: impl PlaceholderGenerator + 'static,
        bundler: impl Bundler + 'static,
    ) -> CompilerService {
        CompilerService::new(Arc::new(generator), Arc::new(bundler))
    }

    #[tokio::test]
    async fn compiles_a_generated_block_into_a_document() {
        let svc = service(
            FixedGenerator("```jsx\nexport default () => <div>X</div>\n```"),
            EchoBundler,
        );
        let html = svc.compile("<App />", Mode::Code, "key").await.unwrap();
        assert!(html.contains("export default () => <div>X</div>"));
        assert!(html.contains(REACT_CDN));
        assert!(html.contains(r#"<div id="root">"#));
    }

    #[tokio::test]
    async fn completion_failure_is_a_generation_error() {
        let svc = service(FailingGenerator, EchoBundler);
        let err = svc.compile("<App />", Mode::Code, "key").await.unwrap_err();
        assert!(matches!(err, CompileError::Generation(_)));
    }

    #[tokio::test]
    async fn output_without_a_code_block_is_a_generation_error() {
        let svc = service(FixedGenerator("sorry, I cannot help with that"), EchoBundler);
        let err = svc.compile("<App />", Mode::Code, "key").await.unwrap_err();
        assert!(matches!(err, CompileError::Generation(_)));
    }

    #[tokio::test]
    async fn raised_bundler_error_is_a_bundle_error() {
        let svc = service(
            FixedGenerator("```jsx\nexport default () => null\n```"),
            BrokenBundler,
        );
        let err = svc.compile("<App />", Mode::Code, "key").await.unwrap_err();
        assert!(matches!(err, CompileError::Bundle(_)));
    }

    #[tokio::test]
    async fn empty_bundle_output_still_yields_a_document() {
        let svc = service(
            FixedGenerator("```jsx\nexport default () => null\n```"),
            EmptyBundler,
        );
        let html = svc.compile("<App />", Mode::Code, "key").await.unwrap();
        assert!(html.contains(r#"<div id="root">"#));
        assert!(html.contains("<script defer>"));
    }
}
