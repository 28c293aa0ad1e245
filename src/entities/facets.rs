//! Shared capability facets for API items
//!
//! The project model composes a handful of capability facets instead of
//! an inheritance chain: the tag/status/version facet ([`Code`]), the C++
//! access specifiers and the opaque annotation list ([`Annos`]). Each is
//! an independent struct so an entity kind picks exactly the facets it
//! needs.

use std::fmt;
use std::str::FromStr;

/// Workflow status of an API item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Present in the current API, nothing pending.
    #[default]
    Unchanged,
    /// Added since the last release.
    Added,
    /// Removed from the API but kept for older versions.
    Removed,
}

impl Status {
    /// The attribute value, empty for the default.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unchanged => "",
            Status::Added => "added",
            Status::Removed => "removed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Status::Unchanged),
            "added" => Ok(Status::Added),
            "removed" => Ok(Status::Removed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// C++ access specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Serialized as an absent attribute.
    #[default]
    Public,
    Protected,
    Private,
}

impl Access {
    /// The attribute value, empty for public.
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Access::Public),
            "protected" => Ok(Access::Protected),
            "private" => Ok(Access::Private),
            _ => Err(format!("Unknown access specifier: {}", s)),
        }
    }
}

/// Access specifier extended with the Qt signal section
///
/// Only manual code needs this; everything else uses [`Access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtendedAccess {
    #[default]
    Public,
    Protected,
    Private,
    Signals,
}

impl ExtendedAccess {
    /// The attribute value, empty for public.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtendedAccess::Public => "",
            ExtendedAccess::Protected => "protected",
            ExtendedAccess::Private => "private",
            ExtendedAccess::Signals => "signals",
        }
    }
}

impl fmt::Display for ExtendedAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtendedAccess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(ExtendedAccess::Public),
            "protected" => Ok(ExtendedAccess::Protected),
            "private" => Ok(ExtendedAccess::Private),
            "signals" => Ok(ExtendedAccess::Signals),
            _ => Err(format!("Unknown access specifier: {}", s)),
        }
    }
}

/// An inclusive range of project release tags
///
/// Empty endpoints are open: `VersionRange { start: "", end: "v6" }`
/// covers everything up to `v6`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    pub start: String,
    pub end: String,
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for VersionRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("Version range without '-': {}", s))?;
        Ok(Self {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// The tag/status facet carried by every API item
///
/// `features` and `platforms` hold tag references: a bare name means the
/// tag applies, a leading `!` inverts it. The lists are conjunctions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code {
    /// Workflow status.
    pub status: Status,

    /// Optional release-tag range the item exists in.
    pub versions: Option<VersionRange>,

    /// Platform tag references.
    pub platforms: Vec<String>,

    /// Feature tag references.
    pub features: Vec<String>,
}

/// A single annotation, e.g. `PyName=foo` or `NoTypeHint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anno {
    pub name: String,
    pub value: Option<String>,
}

/// An opaque, ordered annotation list
///
/// Annotations are kept as parsed `(name, optional value)` pairs rather
/// than structured fields so that keys unknown to this version survive a
/// round trip untouched. Values containing commas or spaces are quoted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annos(pub Vec<Anno>);

impl Annos {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up an annotation value by name.
    pub fn get(&self, name: &str) -> Option<&Anno> {
        self.0.iter().find(|a| a.name == name)
    }
}

impl fmt::Display for Annos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, anno) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            f.write_str(&anno.name)?;
            if let Some(value) = &anno.value {
                if value.contains([',', ' ']) {
                    write!(f, "=\"{}\"", value)?;
                } else {
                    write!(f, "={}", value)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Annos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut annos = Vec::new();

        // Split on commas outside double quotes.
        let mut part = String::new();
        let mut quoted = false;
        let mut parts = Vec::new();
        for c in s.chars() {
            match c {
                '"' => {
                    quoted = !quoted;
                    part.push(c);
                }
                ',' if !quoted => {
                    parts.push(std::mem::take(&mut part));
                }
                _ => part.push(c),
            }
        }
        if quoted {
            return Err(format!("Unterminated quote in annotations: {}", s));
        }
        if !part.is_empty() {
            parts.push(part);
        }

        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((name, value)) => {
                    let value = value.strip_prefix('"').map_or(value, |v| {
                        v.strip_suffix('"').unwrap_or(v)
                    });
                    annos.push(Anno {
                        name: name.to_string(),
                        value: Some(value.to_string()),
                    });
                }
                None => annos.push(Anno {
                    name: part.to_string(),
                    value: None,
                }),
            }
        }

        Ok(Annos(annos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [Status::Unchanged, Status::Added, Status::Removed] {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert!("bogus".parse::<Status>().is_err());
    }

    #[test]
    fn test_access_defaults_to_public() {
        assert_eq!("".parse::<Access>().unwrap(), Access::Public);
        assert_eq!(Access::Public.as_str(), "");
    }

    #[test]
    fn test_version_range_roundtrip() {
        let range: VersionRange = "v5-".parse().unwrap();
        assert_eq!(range.start, "v5");
        assert_eq!(range.end, "");
        assert_eq!(range.to_string(), "v5-");
        assert!("v5".parse::<VersionRange>().is_err());
    }

    #[test]
    fn test_annos_preserve_order_and_unknown_keys() {
        let annos: Annos = "PyName=foo,NoTypeHint,FutureAnno=1".parse().unwrap();
        assert_eq!(annos.0.len(), 3);
        assert_eq!(annos.get("PyName").unwrap().value.as_deref(), Some("foo"));
        assert_eq!(annos.get("NoTypeHint").unwrap().value, None);
        assert_eq!(annos.to_string(), "PyName=foo,NoTypeHint,FutureAnno=1");
    }

    #[test]
    fn test_annos_quoted_values_keep_commas() {
        let annos: Annos = "TypeHint=\"List[int], int\",PyInt".parse().unwrap();
        assert_eq!(
            annos.get("TypeHint").unwrap().value.as_deref(),
            Some("List[int], int")
        );
        assert_eq!(annos.to_string(), "TypeHint=\"List[int], int\",PyInt");
    }

    #[test]
    fn test_empty_annos_display() {
        let annos: Annos = "".parse().unwrap();
        assert!(annos.is_empty());
        assert_eq!(annos.to_string(), "");
    }
}
