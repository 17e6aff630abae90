//! Minimal selector subset used to bind page elements

use std::fmt;
use std::str::FromStr;

use crate::error::PageError;

/// One simple selector: optional tag plus at most one id, class or attribute test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    None,
    Id(String),
    Class(String),
    Attribute(String),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            tag: None,
            filter: Filter::Id(id.into()),
        }
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self {
            tag: None,
            filter: Filter::Class(class.into()),
        }
    }

    pub fn parse(input: &str) -> Result<Self, PageError> {
        let input = input.trim();
        let invalid = |reason: &str| PageError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        if input.is_empty() {
            return Err(invalid("empty selector"));
        }

        let split = input
            .find(|c| matches!(c, '#' | '.' | '['))
            .unwrap_or(input.len());
        let (tag, rest) = input.split_at(split);

        if !tag.chars().all(is_name_char) {
            return Err(invalid("unsupported tag name"));
        }
        let tag = (!tag.is_empty()).then(|| tag.to_ascii_lowercase());

        let filter = if rest.is_empty() {
            Filter::None
        } else if let Some(id) = rest.strip_prefix('#') {
            Filter::Id(name(id).ok_or_else(|| invalid("bad id"))?)
        } else if let Some(class) = rest.strip_prefix('.') {
            Filter::Class(name(class).ok_or_else(|| invalid("bad class name"))?)
        } else {
            let attr = rest
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .ok_or_else(|| invalid("unterminated attribute test"))?;
            Filter::Attribute(name(attr).ok_or_else(|| invalid("bad attribute name"))?)
        };

        if tag.is_none() && filter == Filter::None {
            return Err(invalid("nothing to match"));
        }

        Ok(Self { tag, filter })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn name(s: &str) -> Option<String> {
    (!s.is_empty() && s.chars().all(is_name_char)).then(|| s.to_string())
}

impl FromStr for Selector {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{tag}")?;
        }
        match &self.filter {
            Filter::None => Ok(()),
            Filter::Id(id) => write!(f, "#{id}"),
            Filter::Class(class) => write!(f, ".{class}"),
            Filter::Attribute(attr) => write!(f, "[{attr}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_forms() {
        assert_eq!(Selector::parse("#menu").unwrap(), Selector::id("menu"));
        assert_eq!(Selector::parse(".nav-link").unwrap(), Selector::class("nav-link"));

        let sections = Selector::parse("section[id]").unwrap();
        assert_eq!(sections.tag.as_deref(), Some("section"));
        assert_eq!(sections.filter, Filter::Attribute("id".into()));

        let aos = Selector::parse("[data-aos]").unwrap();
        assert_eq!(aos.tag, None);
        assert_eq!(aos.to_string(), "[data-aos]");
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a[href^=\"#\"]").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("[data-aos").is_err());
        assert!(Selector::parse("#").is_err());
    }
}
