use indexmap::IndexMap;
use kurbo::Shape as _;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{GeometryError, Path};

/// Identifier of one interpolation master
pub type MasterId = SmolStr;

/// The paths of one glyph in one master
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<Path>,
}

impl Outline {
    pub fn new(paths: Vec<Path>) -> Self {
        Outline { paths }
    }

    /// Do both outlines have the same paths with the same node structure?
    pub fn is_compatible_with(&self, other: &Outline) -> bool {
        self.paths.len() == other.paths.len()
            && self
                .paths
                .iter()
                .zip(other.paths.iter())
                .all(|(a, b)| a.is_compatible_with(b))
    }

    /// Control-point-exact bounds of every path, or `None` for an empty outline
    pub fn bounds(&self) -> Result<Option<kurbo::Rect>, GeometryError> {
        let mut bounds: Option<kurbo::Rect> = None;
        for path in &self.paths {
            if path.nodes.is_empty() {
                continue;
            }
            let bbox = path.to_kurbo()?.bounding_box();
            bounds = Some(match bounds {
                Some(b) => b.union(bbox),
                None => bbox,
            });
        }
        Ok(bounds)
    }

    pub fn path(&self, index: usize) -> Result<&Path, GeometryError> {
        self.paths
            .get(index)
            .ok_or(GeometryError::PathNotFound { path: index })
    }

    pub fn path_mut(&mut self, index: usize) -> Result<&mut Path, GeometryError> {
        self.paths
            .get_mut(index)
            .ok_or(GeometryError::PathNotFound { path: index })
    }
}

/// All the outlines of one glyph, keyed by master
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterSet {
    /// The glyph these outlines belong to
    #[serde(default)]
    pub glyph: String,
    pub masters: IndexMap<MasterId, Outline>,
}

impl MasterSet {
    pub fn new(glyph: impl Into<String>) -> Self {
        MasterSet {
            glyph: glyph.into(),
            masters: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<MasterId>, outline: Outline) {
        self.masters.insert(id.into(), outline);
    }

    pub fn get(&self, id: &str) -> Result<&Outline, GeometryError> {
        self.masters
            .get(id)
            .ok_or_else(|| GeometryError::MasterNotFound {
                master: id.to_string(),
            })
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Outline, GeometryError> {
        self.masters
            .get_mut(id)
            .ok_or_else(|| GeometryError::MasterNotFound {
                master: id.to_string(),
            })
    }

    pub fn ids(&self) -> Vec<MasterId> {
        self.masters.keys().cloned().collect()
    }

    /// Check every master in `group` against `source`.
    ///
    /// Returns the group members other than the source, in group order and
    /// without duplicates. Fails with [`GeometryError::IncompatibleTopology`]
    /// naming every master whose paths differ in count or node pattern.
    pub fn compatible_targets(
        &self,
        source: &str,
        group: &[MasterId],
    ) -> Result<Vec<MasterId>, GeometryError> {
        let reference = self.get(source)?;
        let mut targets: Vec<MasterId> = vec![];
        for id in group {
            if id == source || targets.contains(id) {
                continue;
            }
            self.get(id)?;
            targets.push(id.clone());
        }
        let incompatible: Vec<String> = targets
            .iter()
            .filter(|id| {
                self.masters
                    .get(id.as_str())
                    .is_some_and(|outline| !outline.is_compatible_with(reference))
            })
            .map(|id| id.to_string())
            .collect();
        if !incompatible.is_empty() {
            log::warn!(
                "Glyph '{}': masters {} are not compatible with {}",
                self.glyph,
                incompatible.join(", "),
                source
            );
            return Err(GeometryError::IncompatibleTopology {
                masters: incompatible,
            });
        }
        Ok(targets)
    }
}
