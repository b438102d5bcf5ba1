use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no code block found")]
    NoCodeBlock,
}

// Fence, optional language tag, newline, non-greedy body, newline, closing
// fence. Non-greedy matching keeps adjacent blocks from being merged; a
// nested fence inside a block closes at the first subsequent fence.
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([^\n]*)\n(.*?)\n```").unwrap());

const ACCEPTED_TAGS: [&str; 3] = ["", "jsx", "javascript"];

/// Returns the body of the first fenced code block whose language tag is
/// empty, `jsx`, or `javascript`. Tags are compared by exact string equality,
/// so `jsxx` or `tsx` never qualify; non-qualifying blocks are skipped, not
/// rejected. Bodies come back whitespace-exact.
pub fn extract_first_code_block(text: &str) -> Result<String, ExtractError> {
    for caps in FENCED_BLOCK.captures_iter(text) {
        let tag = caps.get(1).map_or("", |m| m.as_str());
        if ACCEPTED_TAGS.contains(&tag) {
            return Ok(caps.get(2).map_or("", |m| m.as_str()).to_string());
        }
    }
    Err(ExtractError::NoCodeBlock)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn returns_jsx_block_body_verbatim() {
        let text = "Sure, here is the placeholder:\n```jsx\nexport default () => <div>X</div>\n```\nLet me know if you need changes.";
        assert_eq!(
            extract_first_code_block(text).unwrap(),
            "export default () => <div>X</div>"
        );
    }

    #[test]
    fn accepts_javascript_and_untagged_blocks() {
        let javascript = "```javascript\nconst a = 1;\n```";
        assert_eq!(extract_first_code_block(javascript).unwrap(), "const a = 1;");

        let untagged = "```\nconst b = 2;\n```";
        assert_eq!(extract_first_code_block(untagged).unwrap(), "const b = 2;");
    }

    #[test]
    fn skips_blocks_tagged_with_other_languages() {
        let text = "```tsx\nconst wrong = true;\n```\nAnd the plain version:\n```jsx\nconst right = true;\n```";
        assert_eq!(extract_first_code_block(text).unwrap(), "const right = true;");
    }

    #[test]
    fn returns_the_first_qualifying_block() {
        let text = "```jsx\nfirst\n```\n```jsx\nsecond\n```";
        assert_eq!(extract_first_code_block(text).unwrap(), "first");
    }

    #[test]
    fn partially_matching_tag_does_not_qualify() {
        let text = "```jsxx\nnot this one\n```";
        assert!(matches!(
            extract_first_code_block(text),
            Err(ExtractError::NoCodeBlock)
        ));
    }

    #[test]
    fn fails_when_there_is_no_block_at_all() {
        assert!(matches!(
            extract_first_code_block("just prose, nothing fenced"),
            Err(ExtractError::NoCodeBlock)
        ));
    }

    #[test]
    fn fails_when_only_disqualified_blocks_exist() {
        let text = "```html\n<div></div>\n```\n```tsx\nconst x: number = 1;\n```";
        assert!(matches!(
            extract_first_code_block(text),
            Err(ExtractError::NoCodeBlock)
        ));
    }

    #[test]
    fn preserves_interior_whitespace_exactly() {
        let body = "const Skeleton = () => (\n  <div>\n\n    <span />\n  </div>\n);\n\nexport default Skeleton;";
        let text = format!("```jsx\n{body}\n```");
        assert_eq!(extract_first_code_block(&text).unwrap(), body);
    }
}
