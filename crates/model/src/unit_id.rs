use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator characters that survive canonicalization unchanged.
const SEPARATORS: &[char] = &['.', ':', '-', '_'];

/// Canonical, namespaced identifier of a unit (e.g. `ys:i.41`).
///
/// Produced by [`make_unit_id`] or a [`UnitIdFactory`]; the canonical form is
/// the unit's identity everywhere in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Get the canonical id string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive a canonical unit id from a namespace and a short human-chosen key.
///
/// Canonicalization is lossless: ASCII letters are lowercased, digits and the
/// separators `.`, `:`, `-`, `_` pass through unchanged. Distinct raw keys
/// map to distinct ids (up to ASCII case), so ids remain human-traceable:
/// `make_unit_id("ys", "I.41")` is always `ys:i.41`.
///
/// Fails with [`ModelError::InvalidIdentifier`] at call time for empty keys
/// and for characters outside the canonicalizable set.
pub fn make_unit_id(namespace: &str, raw_key: &str) -> Result<UnitId> {
    let ns = canonicalize(namespace)?;
    let key = canonicalize(raw_key)?;
    Ok(UnitId(format!("{ns}:{key}")))
}

fn canonicalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModelError::invalid_identifier(raw, "empty key"));
    }

    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if SEPARATORS.contains(&ch) {
            out.push(ch);
        } else if ch.is_whitespace() {
            return Err(ModelError::invalid_identifier(raw, "interior whitespace"));
        } else {
            return Err(ModelError::invalid_identifier(
                raw,
                format!("character '{ch}' cannot be canonicalized losslessly"),
            ));
        }
    }
    Ok(out)
}

/// Identifier factory bound to one corpus namespace.
///
/// Loaders construct one factory per corpus so every unit id shares the same
/// namespace prefix.
#[derive(Debug, Clone)]
pub struct UnitIdFactory {
    namespace: String,
}

impl UnitIdFactory {
    /// Create a factory for the given namespace (canonicalized once, up front)
    pub fn new(namespace: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            namespace: canonicalize(namespace.as_ref())?,
        })
    }

    /// Derive a unit id for a raw key under this factory's namespace
    pub fn make(&self, raw_key: &str) -> Result<UnitId> {
        let key = canonicalize(raw_key)?;
        Ok(UnitId(format!("{}:{key}", self.namespace)))
    }

    /// The canonical namespace this factory stamps onto every id
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}
