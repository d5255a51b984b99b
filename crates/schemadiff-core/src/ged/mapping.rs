use crate::errors::{Result, SchemaDiffError};
use serde::{Deserialize, Serialize};

/// Injective partial map from source vertex indices to target vertex indices
///
/// Both graphs have the same (padded) size, so the forward and inverse
/// tables share one length. Serialized as the sorted list of pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MappingRepr", into = "MappingRepr")]
pub struct Mapping {
    forward: Vec<Option<u32>>,
    inverse: Vec<Option<u32>>,
    len: usize,
}

#[derive(Serialize, Deserialize)]
struct MappingRepr {
    size: usize,
    pairs: Vec<(u32, u32)>,
}

impl Mapping {
    /// Empty mapping over graphs of `size` vertices
    pub fn new(size: usize) -> Self {
        Self {
            forward: vec![None; size],
            inverse: vec![None; size],
            len: 0,
        }
    }

    /// Graph size this mapping ranges over
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Number of mapped pairs
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_total(&self) -> bool {
        self.len == self.size()
    }

    pub fn get(&self, source: u32) -> Option<u32> {
        self.forward.get(source as usize).copied().flatten()
    }

    pub fn get_inverse(&self, target: u32) -> Option<u32> {
        self.inverse.get(target as usize).copied().flatten()
    }

    pub fn is_target_used(&self, target: u32) -> bool {
        self.get_inverse(target).is_some()
    }

    /// Map `source` to `target`
    ///
    /// # Errors
    ///
    /// `MappingOutOfRange` for an index beyond the graph, `NonInjectiveMapping`
    /// if either side is already mapped.
    pub fn insert(&mut self, source: u32, target: u32) -> Result<()> {
        for index in [source, target] {
            if index as usize >= self.size() {
                return Err(SchemaDiffError::MappingOutOfRange {
                    index,
                    size: self.size(),
                });
            }
        }
        if self.forward[source as usize].is_some() || self.inverse[target as usize].is_some() {
            return Err(SchemaDiffError::NonInjectiveMapping {
                source_index: source,
                target_index: target,
            });
        }
        self.forward[source as usize] = Some(target);
        self.inverse[target as usize] = Some(source);
        self.len += 1;
        Ok(())
    }

    /// Unmap `source`, returning its former image
    pub fn remove(&mut self, source: u32) -> Option<u32> {
        let target = self.forward.get_mut(source as usize)?.take()?;
        self.inverse[target as usize] = None;
        self.len -= 1;
        Some(target)
    }

    /// Mapped pairs in source order
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.forward
            .iter()
            .enumerate()
            .filter_map(|(s, t)| t.map(|t| (s as u32, t)))
    }
}

impl TryFrom<MappingRepr> for Mapping {
    type Error = SchemaDiffError;

    fn try_from(repr: MappingRepr) -> Result<Self> {
        let mut mapping = Mapping::new(repr.size);
        for (s, t) in repr.pairs {
            mapping.insert(s, t)?;
        }
        Ok(mapping)
    }
}

impl From<Mapping> for MappingRepr {
    fn from(mapping: Mapping) -> Self {
        MappingRepr {
            size: mapping.size(),
            pairs: mapping.pairs().collect(),
        }
    }
}
