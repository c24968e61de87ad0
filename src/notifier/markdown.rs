use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*#*$").expect("valid header regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("valid bold regex"));
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").expect("valid link regex")
});

/// Convert pipeline Markdown to Slack mrkdwn
///
/// - `# Header` -> `*Header*`
/// - `**bold**` / `__bold__` -> `*bold*`
/// - `[text](url)` -> `<url|text>`
///
/// Fenced code blocks and inline code spans are left untouched.
pub fn markdown_to_slack(text: &str) -> String {
    let mut in_fence = false;

    text.split('\n')
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return line.to_string();
            }
            if in_fence {
                return line.to_string();
            }
            convert_line(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn convert_line(line: &str) -> String {
    if let Some(caps) = HEADER.captures(line) {
        let inner = convert_inline(&caps[1]);
        // Avoid `**` when the header text was already bold
        let inner = inner.trim_matches('*');
        return format!("*{}*", inner);
    }
    convert_inline(line)
}

/// Convert inline markup outside of `code spans`
fn convert_inline(line: &str) -> String {
    line.split('`')
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                return part.to_string();
            }
            let part = LINK.replace_all(part, "<$2|$1>");
            BOLD.replace_all(&part, |caps: &regex::Captures| {
                let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                format!("*{}*", inner)
            })
            .into_owned()
        })
        .collect::<Vec<_>>()
        .join("`")
}
