use std::io::Read;

use common::{wrapper, BytesToStringExt, MyResult};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::placeholder::{Collision, PlaceholderMap};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\{\{\s*[^{}\s]+\s*\}\}").unwrap();
}

wrapper!(
#[derive(Debug, Clone, PartialEq, Eq)]
pub Template wraps String
);

/// Result of [Template::fill].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filled {
    pub html: String,
    /// `{{...}}` tokens still present after substitution
    pub unresolved: Vec<String>,
    pub collisions: Vec<Collision>,
}

impl Template {
    /// Reads the whole template; it must be valid UTF-8.
    pub fn from_reader<R: Read>(mut read: R) -> MyResult<Self> {
        let mut buf = Vec::new();
        read.read_to_end(&mut buf)?;
        buf.to_str().map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Distinct placeholder tokens, in order of first appearance.
    pub fn tokens(&self) -> Vec<String> {
        scan_tokens(&self.0)
    }

    pub fn fill(&self, variables: &PlaceholderMap) -> Filled {
        let html = variables
            .iter()
            .fold(self.0.clone(), |html, (token, value)| {
                let hits = html.matches(token).count();
                log::debug!("{token}: {hits} occurrence(s)");
                if hits == 0 {
                    html
                } else {
                    html.replace(token, value)
                }
            });
        Filled {
            unresolved: scan_tokens(&html),
            collisions: variables.collisions(),
            html,
        }
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

pub fn scan_tokens(html: &str) -> Vec<String> {
    TOKEN
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .unique()
        .collect()
}
