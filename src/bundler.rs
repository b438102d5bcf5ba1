use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to run bundler: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that maps component source to browser-ready script text. An empty
/// output string is a legitimate degraded result, distinct from an `Err`.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, source: &str) -> Result<String, BundleError>;
}

/// Marker replaced with the generated placeholder module when the entry is
/// composed. The harness renders through the React/ReactDOM UMD globals the
/// surrounding document loads, so the generated code needs no imports.
const PLACEHOLDER_MARKER: &str = "/* __PLACEHOLDER_MODULE__ */";

const ENTRY_TEMPLATE: &str = r##"/* __PLACEHOLDER_MODULE__ */

ReactDOM.createRoot(document.querySelector("#root")).render(React.createElement(__Placeholder));
"##;

/// Drives the external esbuild binary. The entry module is composed in memory
/// and piped over stdin; the generated source is never written to disk, so
/// bundling stays stateless and request-isolated.
pub struct EsbuildBundler {
    bin: String,
}

impl EsbuildBundler {
    pub fn new(bin: String) -> Self {
        Self { bin }
    }

    // The generated module's default export becomes the harness's
    // `__Placeholder` binding. The prompt constrains the model to a single
    // default-exported component, so one rewrite is enough.
    fn compose_entry(source: &str) -> String {
        let module = source.replacen("export default", "const __Placeholder =", 1);
        ENTRY_TEMPLATE.replace(PLACEHOLDER_MARKER, &module)
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, source: &str) -> Result<String, BundleError> {
        let entry = Self::compose_entry(source);

        let mut child = Command::new(&self.bin)
            .args([
                "--bundle",
                "--minify",
                "--format=iife",
                "--target=esnext",
                "--platform=browser",
                "--loader=jsx",
                "--loader:.js=jsx",
                "--loader:.ts=tsx",
                "--loader:.tsx=tsx",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(BundleError::Io(std::io::Error::other(
                "bundler stdin was not captured",
            )));
        };
        stdin.write_all(entry.as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            // A failed build degrades to "no output" rather than raising; the
            // orchestrator still wraps the (empty) script into a document.
            error!(
                "❌ Bundler exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
            return Ok(String::new());
        }

        let script = String::from_utf8_lossy(&output.stdout).into_owned();
        info!("✅ Bundled {} bytes of script", script.len());
        Ok(script)
    }
}
