// Slug Domain Model
//
// A slug base is derived from a title; uniqueness is the registry's job.

use super::error::{DomainError, Result};

/// Base used when a title has no ASCII alphanumerics at all
pub const FALLBACK_SLUG_BASE: &str = "listing";

/// Upper bound on a stored slug, suffix included
pub const MAX_SLUG_LEN: usize = 200;

/// Room kept for "-" plus the widest u32 suffix
const SUFFIX_RESERVE: usize = 11;

/// Normalized slug base: lowercase ASCII alphanumerics joined by single '-'
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    /// Normalize a title into a slug base.
    ///
    /// Runs of anything that is not an ASCII letter or digit collapse into a
    /// single separator; leading/trailing separators are dropped.
    ///
    /// # Errors
    /// `DomainError::EmptySlug` if nothing survives normalization.
    pub fn from_title(title: &str) -> Result<Self> {
        let mut out = String::with_capacity(title.len());
        let mut pending_sep = false;

        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(c.to_ascii_lowercase());
            } else {
                pending_sep = true;
            }
        }

        if out.len() > MAX_SLUG_LEN - SUFFIX_RESERVE {
            out.truncate(MAX_SLUG_LEN - SUFFIX_RESERVE);
            while out.ends_with('-') {
                out.pop();
            }
        }

        if out.is_empty() {
            return Err(DomainError::EmptySlug(title.to_string()));
        }
        Ok(Self(out))
    }

    /// Like `from_title`, but an empty result falls back to `FALLBACK_SLUG_BASE`
    pub fn from_title_or_fallback(title: &str) -> Self {
        Self::from_title(title).unwrap_or_else(|_| Self(FALLBACK_SLUG_BASE.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Candidate for the given attempt: the bare base first, then `base-1`, `base-2`, ...
    pub fn candidate(&self, attempt: u32) -> String {
        if attempt == 0 {
            self.0.clone()
        } else {
            format!("{}-{}", self.0, attempt)
        }
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
