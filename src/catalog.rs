//! In-memory metadata universe and document index.
//!
//! A [Catalog] is the collaborator hosts reach for when they have no reflection layer of their
//! own: types, their bases, interfaces and members, with Markdown documentation decoded through a
//! [FragmentCodec]. It can be built programmatically or loaded from TOML:
//!
//! ```toml
//! [resolver]
//! max_depth = 32
//!
//! [[types]]
//! name = "Acme.Circle"
//! base = "Acme.Shape"
//! interfaces = ["Acme.IDrawable"]
//! doc = "A round [shape](cref:T:Acme.Shape)."
//!
//! [[types.members]]
//! name = "Area"
//! kind = "property"
//! doc = "<inheritdoc/>"
//! ```

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs::read_to_string,
    path::Path,
    sync::Arc,
};

use crate::{
    codec::{FragmentCodec, MdCodec},
    config::ResolverConfig,
    error::DocweaveError,
    fragment::Fragment,
    identity::{CrefKind, CrefTarget, DocKey, MemberKind, TypeToken},
    provider::{DocumentIndex, MetadataUniverse},
    resolve::DocCache,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEntry {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl MemberEntry {
    pub fn new<S: Into<String>>(name: S, kind: MemberKind) -> MemberEntry {
        MemberEntry {
            name: name.into(),
            kind,
            doc: None,
        }
    }

    pub fn doc<S: Into<String>>(mut self, doc: S) -> MemberEntry {
        self.doc = Some(doc.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

impl TypeEntry {
    pub fn new<S: Into<String>>(name: S) -> TypeEntry {
        TypeEntry {
            name: name.into(),
            base: None,
            interfaces: Vec::new(),
            doc: None,
            members: Vec::new(),
        }
    }

    pub fn base<S: Into<String>>(mut self, base: S) -> TypeEntry {
        self.base = Some(base.into());
        self
    }

    pub fn interface<S: Into<String>>(mut self, interface: S) -> TypeEntry {
        self.interfaces.push(interface.into());
        self
    }

    pub fn doc<S: Into<String>>(mut self, doc: S) -> TypeEntry {
        self.doc = Some(doc.into());
        self
    }

    pub fn member(mut self, member: MemberEntry) -> TypeEntry {
        self.members.push(member);
        self
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    resolver: ResolverConfig,
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Default)]
struct TypeRecord {
    base: Option<TypeToken>,
    interfaces: Vec<TypeToken>,
    members: Vec<DocKey>,
}

#[derive(Clone)]
pub struct Catalog {
    types: BTreeMap<TypeToken, TypeRecord>,
    simple_names: BTreeMap<String, BTreeSet<TypeToken>>,
    fragments: BTreeMap<DocKey, Arc<Fragment>>,
    config: ResolverConfig,
    codec: Arc<dyn FragmentCodec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::with_codec(Arc::new(MdCodec))
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog({} types, {} fragments)",
            self.types.len(),
            self.fragments.len()
        )
    }
}

impl Catalog {
    pub fn with_codec(codec: Arc<dyn FragmentCodec>) -> Catalog {
        Catalog {
            types: BTreeMap::new(),
            simple_names: BTreeMap::new(),
            fragments: BTreeMap::new(),
            config: ResolverConfig::default(),
            codec,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Catalog, DocweaveError> {
        let file: CatalogFile = toml::from_str(content)?;
        if file.resolver.max_depth == 0 {
            return Err(DocweaveError::Serialization(
                "resolver.max_depth must be at least 1".to_string(),
            ));
        }
        let mut catalog = Catalog {
            config: file.resolver,
            ..Catalog::default()
        };
        for entry in file.types {
            catalog.add_type(entry)?;
        }
        Ok(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog, DocweaveError> {
        let path = path.as_ref();
        tracing::debug!("Reading documentation catalog from {:?}", path);
        let content = read_to_string(path)?;
        let catalog = Catalog::from_toml_str(&content)?;
        tracing::debug!("Loaded {:?}", catalog);
        Ok(catalog)
    }

    /// Register a type, its members and their documentation. Registering a type name twice
    /// replaces the earlier declaration. Nothing is registered when a doc fails to decode.
    pub fn add_type(&mut self, entry: TypeEntry) -> Result<(), DocweaveError> {
        let ty = TypeToken::new(entry.name.trim());
        if ty.full_name().is_empty() {
            return Err(DocweaveError::Serialization(
                "catalog type entries need a name".to_string(),
            ));
        }

        let mut decoded = Vec::new();
        if let Some(doc) = entry.doc.as_deref() {
            decoded.push((DocKey::of_type(ty.clone()), self.codec.decode(doc)?));
        }
        let mut members = Vec::with_capacity(entry.members.len());
        for member in entry.members {
            let key = DocKey::member(ty.clone(), member.name, member.kind);
            if let Some(doc) = member.doc.as_deref() {
                decoded.push((key.clone(), self.codec.decode(doc)?));
            }
            if !members.contains(&key) {
                members.push(key);
            }
        }

        if let Some(previous) = self.types.remove(&ty) {
            tracing::warn!("[Catalog::add_type] replacing earlier declaration of {ty}");
            self.fragments.remove(&DocKey::of_type(ty.clone()));
            for member in previous.members {
                self.fragments.remove(&member);
            }
        }
        for (key, fragment) in decoded {
            self.insert_fragment(key, fragment);
        }

        self.simple_names
            .entry(ty.simple_name().to_string())
            .or_default()
            .insert(ty.clone());
        self.types.insert(
            ty,
            TypeRecord {
                base: entry.base.map(TypeToken::new),
                interfaces: entry.interfaces.into_iter().map(TypeToken::new).collect(),
                members,
            },
        );
        Ok(())
    }

    /// Attach an already parsed fragment to `key`, replacing any earlier one.
    pub fn insert_fragment(&mut self, key: DocKey, fragment: Fragment) {
        self.fragments.insert(key, Arc::new(fragment));
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn contains_type(&self, ty: &TypeToken) -> bool {
        self.types.contains_key(ty)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Wrap the catalog in a [DocCache] configured from its `[resolver]` table.
    pub fn into_cache(self) -> DocCache {
        let config = self.config.clone();
        let catalog = Arc::new(self);
        DocCache::with_config(catalog.clone(), catalog, config)
    }

    /// Exact full name first, then simple name. Ambiguous simple names pick the lowest full name.
    fn find_type(&self, path: &str) -> Option<TypeToken> {
        let token = TypeToken::new(path);
        if self.types.contains_key(&token) {
            return Some(token);
        }
        self.simple_names
            .get(path)
            .and_then(|candidates| candidates.iter().next())
            .cloned()
    }

    fn find_member(&self, target: &CrefTarget, kind: Option<MemberKind>) -> Option<DocKey> {
        let (ty_path, name) = target.split_member()?;
        let ty = self.find_type(ty_path)?;
        self.types
            .get(&ty)?
            .members
            .iter()
            .filter(|member| member.member_name() == Some(name))
            .filter(|member| kind.is_none() || member.member_kind() == kind)
            .min_by_key(|member| member.member_kind())
            .cloned()
    }

    /// Depth-first, `interface` before the interfaces it extends.
    fn collect_interfaces(
        &self,
        interface: &TypeToken,
        seen: &mut BTreeSet<TypeToken>,
        found: &mut Vec<TypeToken>,
    ) {
        if !seen.insert(interface.clone()) {
            return;
        }
        found.push(interface.clone());
        if let Some(record) = self.types.get(interface) {
            for extended in &record.interfaces {
                self.collect_interfaces(extended, seen, found);
            }
        }
    }
}

impl DocumentIndex for Catalog {
    fn fragment(&self, key: &DocKey) -> Option<Arc<Fragment>> {
        self.fragments.get(key).cloned()
    }
}

impl MetadataUniverse for Catalog {
    fn base_type(&self, ty: &TypeToken) -> Option<TypeToken> {
        self.types.get(ty).and_then(|record| record.base.clone())
    }

    /// Every interface `ty` implements: each listed interface followed by the interfaces it
    /// extends, then those picked up along the base chain. Each appears once, first sighting
    /// wins.
    fn interfaces(&self, ty: &TypeToken) -> Vec<TypeToken> {
        let mut seen = BTreeSet::new();
        let mut found = Vec::new();
        let mut visited_types = BTreeSet::from([ty.clone()]);
        let mut current = Some(ty.clone());
        while let Some(declaring) = current {
            if let Some(record) = self.types.get(&declaring) {
                for interface in &record.interfaces {
                    self.collect_interfaces(interface, &mut seen, &mut found);
                }
            }
            current = self
                .base_type(&declaring)
                .filter(|base| visited_types.insert(base.clone()));
        }
        found
    }

    fn members(&self, ty: &TypeToken) -> Vec<DocKey> {
        self.types
            .get(ty)
            .map(|record| record.members.clone())
            .unwrap_or_default()
    }

    fn resolve_by_name(&self, identifier: &str) -> Option<DocKey> {
        let target = CrefTarget::parse(identifier);
        if target.is_empty() {
            return None;
        }
        match target.kind {
            CrefKind::Type => self.find_type(&target.path).map(DocKey::of_type),
            CrefKind::Member(kind) => self.find_member(&target, Some(kind)),
            CrefKind::Unknown => self
                .find_type(&target.path)
                .map(DocKey::of_type)
                .or_else(|| self.find_member(&target, None)),
        }
    }
}
