//! Markdown rendering
//!
//! This module renders a pipeline result as a human-readable markdown
//! document: the roadmap, then each level's articles and videos.

use crate::model::{Level, PipelineResult, Resource};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown rendering of a result to a file
///
/// # Arguments
///
/// * `result` - The pipeline result
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown
/// * `Err(OutputError)` - Failed to write the file
pub fn write_markdown(result: &PipelineResult, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a pipeline result as markdown
pub fn format_markdown(result: &PipelineResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Learning Roadmap: {}\n\n", result.query));

    md.push_str("## Roadmap\n\n");
    if result.roadmap.is_empty() {
        md.push_str("*No roadmap topics were recognised.*\n\n");
    }
    for level in Level::ALL {
        let topics = result.roadmap.topics(level);
        if topics.is_empty() {
            continue;
        }
        md.push_str(&format!("### {}\n\n", title_case(level.as_str())));
        for topic in topics {
            md.push_str(&format!("- {}\n", strip_bullet(topic)));
        }
        md.push('\n');
    }

    md.push_str("## Resources\n\n");
    for level in Level::ALL {
        md.push_str(&format!("### {}\n\n", title_case(level.as_str())));

        let set = result.level(level);
        let articles = set.map(|s| s.articles()).unwrap_or_default();
        let videos = set.map(|s| s.videos()).unwrap_or_default();

        push_resource_list(&mut md, "Articles", articles);
        push_resource_list(&mut md, "Videos", videos);
    }

    md
}

fn push_resource_list(md: &mut String, heading: &str, resources: &[Resource]) {
    md.push_str(&format!("**{}**\n\n", heading));
    if resources.is_empty() {
        md.push_str("- *None found*\n\n");
        return;
    }
    for resource in resources {
        md.push_str(&format!(
            "- [{}]({}) ({})\n",
            escape_link_text(resource.title()),
            resource.url(),
            resource.source()
        ));
    }
    md.push('\n');
}

/// Drops a leading list marker the generator may have added (`-`, `*`, `1.`)
fn strip_bullet(line: &str) -> &str {
    let marker_len = match line.chars().next() {
        Some(c @ ('-' | '*' | '•')) => c.len_utf8(),
        _ => {
            let digits = line.chars().take_while(char::is_ascii_digit).count();
            match line[digits..].chars().next() {
                Some('.' | ')') if digits > 0 => digits + 1,
                _ => 0,
            }
        }
    };

    let rest = &line[marker_len..];
    if marker_len > 0 && rest.starts_with(char::is_whitespace) {
        rest.trim_start()
    } else {
        line
    }
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
