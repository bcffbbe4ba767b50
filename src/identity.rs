/// [crate::identity] contains [DocKey], the identity every documented declaration is cached
/// under, and [CrefTarget], the parsed form of a cross-reference target string.
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::DocweaveError;

/// Fully qualified name of a type, e.g. `Acme.Shapes.Circle`. Nested types use `+` or `.` as
/// the host metadata system reports them; the token is compared verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TypeToken(String);

impl TypeToken {
    pub fn new<S: Into<String>>(full_name: S) -> TypeToken {
        TypeToken(full_name.into())
    }

    pub fn full_name(&self) -> &str {
        &self.0
    }

    /// The last path segment: `Circle` for `Acme.Shapes.Circle`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last path segment, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(ns, _)| ns)
    }
}

impl Display for TypeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeToken {
    fn from(full_name: &str) -> Self {
        TypeToken::new(full_name)
    }
}

impl From<String> for TypeToken {
    fn from(full_name: String) -> Self {
        TypeToken(full_name)
    }
}

/// The kinds of type members that carry their own documentation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    Field,
    Method,
}

impl MemberKind {
    /// The single-letter prefix used for this member kind in cref notation.
    pub fn cref_prefix(&self) -> char {
        match self {
            MemberKind::Property => 'P',
            MemberKind::Field => 'F',
            MemberKind::Method => 'M',
        }
    }
}

impl Display for MemberKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MemberKind::Property => "property",
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        };
        write!(f, "{name}")
    }
}

impl FromStr for MemberKind {
    type Err = DocweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "property" | "p" => Ok(MemberKind::Property),
            "field" | "f" => Ok(MemberKind::Field),
            "method" | "m" => Ok(MemberKind::Method),
            other => Err(DocweaveError::Serialization(format!(
                "Unknown member kind '{other}'"
            ))),
        }
    }
}

/// Identity of a documentable declaration. Used as the key of the resolution cache, so equal
/// metadata must always produce equal keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum DocKey {
    Type {
        ty: TypeToken,
    },
    Member {
        ty: TypeToken,
        name: String,
        kind: MemberKind,
    },
}

impl DocKey {
    pub fn of_type<T: Into<TypeToken>>(ty: T) -> DocKey {
        DocKey::Type { ty: ty.into() }
    }

    pub fn member<T: Into<TypeToken>, S: Into<String>>(ty: T, name: S, kind: MemberKind) -> DocKey {
        DocKey::Member {
            ty: ty.into(),
            name: name.into(),
            kind,
        }
    }

    /// The type itself for [DocKey::Type], the declaring type for [DocKey::Member].
    pub fn declaring_type(&self) -> &TypeToken {
        match self {
            DocKey::Type { ty } => ty,
            DocKey::Member { ty, .. } => ty,
        }
    }

    pub fn member_name(&self) -> Option<&str> {
        match self {
            DocKey::Type { .. } => None,
            DocKey::Member { name, .. } => Some(name),
        }
    }

    pub fn member_kind(&self) -> Option<MemberKind> {
        match self {
            DocKey::Type { .. } => None,
            DocKey::Member { kind, .. } => Some(*kind),
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, DocKey::Member { .. })
    }

    /// True when `other` is a member with the same name and kind as `self`, regardless of the
    /// declaring type. This is how an overriding member is matched against its candidates.
    pub fn same_signature(&self, other: &DocKey) -> bool {
        match (self, other) {
            (
                DocKey::Member { name, kind, .. },
                DocKey::Member {
                    name: other_name,
                    kind: other_kind,
                    ..
                },
            ) => name == other_name && kind == other_kind,
            _ => false,
        }
    }
}

/// Displays in cref notation: `T:Ns.Type`, `P:Ns.Type.Name`, `F:...`, `M:...`.
impl Display for DocKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocKey::Type { ty } => write!(f, "T:{ty}"),
            DocKey::Member { ty, name, kind } => write!(f, "{}:{ty}.{name}", kind.cref_prefix()),
        }
    }
}

/// What a cref prefix says about the declaration it targets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrefKind {
    Type,
    Member(MemberKind),
    /// No prefix, `!:` (unresolved by the producing compiler) or a prefix we don't know.
    #[default]
    Unknown,
}

/// A cross-reference target string split into its kind prefix and dotted path.
///
/// Parsing never fails. Method parameter lists (`M:Ns.Type.Run(System.String)`) and generic
/// arity suffixes on the final segment (`` Foo`1 ``) are dropped, since member identities are
/// keyed by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrefTarget {
    pub kind: CrefKind,
    pub path: String,
}

impl CrefTarget {
    pub fn parse(target: &str) -> CrefTarget {
        let target = target.trim();
        let (kind, rest) = match target.split_once(':') {
            Some((prefix, rest)) if prefix.len() == 1 => {
                let kind = match prefix {
                    "T" => CrefKind::Type,
                    "P" => CrefKind::Member(MemberKind::Property),
                    "F" => CrefKind::Member(MemberKind::Field),
                    "M" => CrefKind::Member(MemberKind::Method),
                    _ => CrefKind::Unknown,
                };
                (kind, rest)
            }
            _ => (CrefKind::Unknown, target),
        };
        let path = rest.split('(').next().unwrap_or(rest);
        let path = match path.rsplit_once('`') {
            Some((head, arity)) if arity.chars().all(|c| c.is_ascii_digit()) => head,
            _ => path,
        };
        CrefTarget {
            kind,
            path: path.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Split the path at its last `.` into (type path, member name).
    pub fn split_member(&self) -> Option<(&str, &str)> {
        self.path
            .rsplit_once('.')
            .filter(|(ty, name)| !ty.is_empty() && !name.is_empty())
    }
}

impl From<&str> for CrefTarget {
    fn from(target: &str) -> Self {
        CrefTarget::parse(target)
    }
}
