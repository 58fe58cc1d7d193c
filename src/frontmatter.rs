//! Front-matter header parsing for Markdown files.
//!
//! The header is a run of lines at the top of the file, each beginning with
//! the literal marker `---`. The first line that does not start with the
//! marker ends the header and is the first line of the document body.

/// Metadata extracted from a Markdown file header. Absent fields are
/// omitted from the rendered metadata bar.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.author.is_none() && self.tags.is_empty()
    }
}

/// Split `input` into its front matter and the remaining body text.
///
/// Never fails: malformed or absent front matter yields an all-empty
/// `FrontMatter` and the whole input as body. Marker lines that match none
/// of the known keys are consumed and ignored.
pub fn parse(input: &str) -> (FrontMatter, &str) {
    let mut front = FrontMatter::default();
    let mut offset = 0;

    for line in input.split_inclusive('\n') {
        if !line.starts_with("---") {
            break;
        }
        if line.starts_with("---title:") {
            front.title = value_after_colon(line);
        } else if line.starts_with("---date:") {
            front.date = value_after_colon(line);
        } else if line.starts_with("---author:") {
            front.author = value_after_colon(line);
        } else if line.starts_with("---tags:") {
            if let Some(value) = value_after_colon(line) {
                // Tags split on commas; individual tags are not re-trimmed.
                front.tags = value.split(',').map(str::to_string).collect();
            }
        }
        offset += line.len();
    }

    (front, &input[offset..])
}

/// Everything after the first `:` on the line, trimmed. Empty values count
/// as absent.
fn value_after_colon(line: &str) -> Option<String> {
    let (_, value) = line.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
