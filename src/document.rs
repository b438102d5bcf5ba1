pub const REACT_CDN: &str = "https://unpkg.com/react@18/umd/react.production.min.js";
pub const REACT_DOM_CDN: &str = "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js";
pub const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Wraps a bundled script in the fixed page skeleton: React and Tailwind from
/// their CDNs, a white background, and the `#root` mount point the script
/// targets. The script runs once the document has loaded. Total function; the
/// script text is trusted as produced by the earlier stages.
pub fn assemble_document(bundled_script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <script crossorigin src="{REACT_CDN}"></script>
    <script crossorigin src="{REACT_DOM_CDN}"></script>
    <script src="{TAILWIND_CDN}"></script>
</head>
<body style="background-color:#fff">
    <script defer>window.addEventListener("DOMContentLoaded", (event) => {{
    {bundled_script}
    }});</script>
    <div id="root"></div>
</body>
</html>
"#
    )
}
