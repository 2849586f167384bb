//! Fetched chapter payloads

use serde::{Deserialize, Serialize};

/// A single manga page image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRef {
    /// 1-based page number within the chapter
    pub number: usize,

    /// Source image URL (before any proxying)
    pub url: String,
}

impl PageRef {
    pub fn new(number: usize, url: impl Into<String>) -> Self {
        Self {
            number,
            url: url.into(),
        }
    }
}

/// The content of one chapter, shaped by the kind of work
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentUnit {
    /// Ordered page images (manga)
    Pages(Vec<PageRef>),

    /// HTML-formatted text (novel)
    Text(String),
}

impl ContentUnit {
    /// Build a page sequence from image URLs, numbering pages from 1
    pub fn pages<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentUnit::Pages(
            urls.into_iter()
                .enumerate()
                .map(|(i, url)| PageRef::new(i + 1, url))
                .collect(),
        )
    }

    /// Number of pages, or paragraphs for text
    pub fn len(&self) -> usize {
        match self {
            ContentUnit::Pages(pages) => pages.len(),
            ContentUnit::Text(_) => self.paragraphs().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_pages(&self) -> Option<&[PageRef]> {
        match self {
            ContentUnit::Pages(pages) => Some(pages),
            ContentUnit::Text(_) => None,
        }
    }

    pub fn as_html(&self) -> Option<&str> {
        match self {
            ContentUnit::Text(html) => Some(html),
            ContentUnit::Pages(_) => None,
        }
    }

    /// Plain-text paragraphs of a text chapter, whitespace collapsed.
    /// Empty for page content.
    pub fn paragraphs(&self) -> Vec<String> {
        use scraper::{Html, Selector};

        let Some(html) = self.as_html() else {
            return Vec::new();
        };
        let Ok(selector) = Selector::parse("p") else {
            return Vec::new();
        };

        let fragment = Html::parse_fragment(html);
        fragment
            .select(&selector)
            .map(|p| {
                p.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|text| !text.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_numbered_from_one() {
        let unit = ContentUnit::pages(["a.jpg", "b.jpg"]);
        let pages = unit.as_pages().unwrap();
        assert_eq!(pages[0], PageRef::new(1, "a.jpg"));
        assert_eq!(pages[1].number, 2);
        assert_eq!(unit.len(), 2);
    }

    #[test]
    fn test_content_serialization_shape() {
        let unit = ContentUnit::Text("<p>Hi</p>".to_string());
        insta::assert_json_snapshot!(unit, @r###"
        {
          "type": "text",
          "value": "<p>Hi</p>"
        }
        "###);
    }

    #[test]
    fn test_paragraphs_extracted() {
        let unit = ContentUnit::Text(
            "<p>The sky  above\n the port.</p><br/><p>  </p><p>\"Another <em>day</em>,\" he said.</p>"
                .to_string(),
        );
        assert_eq!(
            unit.paragraphs(),
            vec![
                "The sky above the port.".to_string(),
                "\"Another day,\" he said.".to_string()
            ]
        );
        assert_eq!(unit.len(), 2);
        assert!(unit.as_pages().is_none());
    }
}
