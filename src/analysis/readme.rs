use super::SignalExtractor;
use crate::error::Result;
use crate::models::config::ReadmeConfig;
use crate::models::signal_score::{saturate, SignalName, SignalScore};
use crate::models::snapshot::RepositorySnapshot;

/// Topic → heading keywords that indicate the topic is covered.
const TOPICS: &[(&str, &[&str])] = &[
    ("overview", &["overview", "about", "description", "what is", "introduction"]),
    ("setup", &["setup", "installation", "install", "getting started", "quick start", "quickstart"]),
    ("usage", &["usage", "how to use", "tutorial", "examples", "example"]),
    ("architecture", &["architecture", "design", "structure", "internals"]),
    ("contributing", &["contributing", "contribution", "contribute", "development"]),
];

#[derive(Debug, Default, PartialEq)]
pub(crate) struct ReadmeOutline {
    pub headings: Vec<String>,
    pub code_blocks: usize,
}

/// ATX headings and fenced code blocks. Headings inside fences are ignored;
/// an unterminated fence still counts as one block.
pub(crate) fn outline(text: &str) -> ReadmeOutline {
    let mut outline = ReadmeOutline::default();
    let mut open_fence: Option<char> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence_marker(trimmed) {
            match open_fence {
                Some(open) if open == marker => open_fence = None,
                Some(_) => {}
                None => {
                    open_fence = Some(marker);
                    outline.code_blocks += 1;
                }
            }
            continue;
        }
        if open_fence.is_some() {
            continue;
        }

        if let Some(title) = atx_heading(trimmed) {
            outline.headings.push(title.to_lowercase());
        }
    }

    outline
}

fn fence_marker(line: &str) -> Option<char> {
    if line.starts_with("```") {
        Some('`')
    } else if line.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

fn atx_heading(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

pub struct ReadmeExtractor {
    config: ReadmeConfig,
}

impl ReadmeExtractor {
    pub fn new(config: ReadmeConfig) -> Self {
        Self { config }
    }
}

impl SignalExtractor for ReadmeExtractor {
    fn signal(&self) -> SignalName {
        SignalName::Readme
    }

    fn extract(&self, snapshot: &RepositorySnapshot) -> Result<SignalScore> {
        let text = match snapshot.readme.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                return Ok(SignalScore::new(SignalName::Readme, 0.0, 0.0).with_detail("No README found"))
            }
        };

        let outline = outline(text);
        let topics: Vec<&str> = TOPICS
            .iter()
            .filter(|(_, keywords)| {
                outline
                    .headings
                    .iter()
                    .any(|h| keywords.iter().any(|kw| h.contains(kw)))
            })
            .map(|(topic, _)| *topic)
            .collect();

        let sections = saturate(outline.headings.len() as f64, self.config.section_saturation);
        let code = saturate(outline.code_blocks as f64, self.config.code_block_saturation);
        let coverage = topics.len() as f64 / TOPICS.len() as f64;

        let normalized = (self.config.section_weight * sections
            + self.config.code_block_weight * code
            + self.config.topic_weight * coverage)
            .clamp(0.0, 1.0);

        let mut score = SignalScore::new(SignalName::Readme, outline.headings.len() as f64, normalized)
            .with_detail(format!(
                "{} sections, {} code examples",
                outline.headings.len(),
                outline.code_blocks
            ))
            .with_detail(format!("Found {}/{} key topics", topics.len(), TOPICS.len()));
        if !topics.is_empty() {
            score = score.with_detail(format!("Topics: {}", topics.join(", ")));
        }
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(readme: Option<&str>) -> SignalScore {
        let snapshot = RepositorySnapshot {
            readme: readme.map(str::to_string),
            ..Default::default()
        };
        ReadmeExtractor::new(ReadmeConfig::default())
            .extract(&snapshot)
            .unwrap()
    }

    #[test]
    fn missing_or_blank_readme_scores_zero() {
        assert_eq!(extract(None).normalized, 0.0);
        assert_eq!(extract(Some("   \n")).normalized, 0.0);
    }

    #[test]
    fn ignores_headings_inside_code_fences() {
        let text = "# Title\n```sh\n# not a heading\n```\n## Usage\n";
        let outline = outline(text);
        assert_eq!(outline.headings, vec!["title", "usage"]);
        assert_eq!(outline.code_blocks, 1);
    }

    #[test]
    fn hashtags_are_not_headings() {
        let outline = outline("#rustlang is great\n#\n####### too deep\n");
        assert!(outline.headings.is_empty());
    }

    #[test]
    fn sections_beyond_saturation_add_nothing() {
        let eight: String = (0..8).map(|i| format!("## Part {i}\n")).collect();
        let twenty: String = (0..20).map(|i| format!("## Part {i}\n")).collect();

        let at_threshold = extract(Some(&eight));
        let beyond = extract(Some(&twenty));
        assert_eq!(at_threshold.normalized, beyond.normalized);
        assert_eq!(beyond.raw_value, 20.0);
    }

    #[test]
    fn complete_readme_scores_full() {
        let text = "\
# Overview
## Installation
```sh
cargo install tool
```
## Usage
```rust
tool::run();
```
## Architecture
```text
a -> b
```
## Contributing
## License
## FAQ
## Changelog
";
        let score = extract(Some(text));
        assert!((score.normalized - 1.0).abs() < 1e-9);
    }

    #[test]
    fn plain_text_readme_scores_zero() {
        let score = extract(Some("just a sentence about the project"));
        assert_eq!(score.normalized, 0.0);
    }
}
