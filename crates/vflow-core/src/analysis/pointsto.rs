use crate::module::Module;
use crate::values::ValueId;
use crate::VflowError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasResult {
    NoAlias,
    MayAlias,
    MustAlias,
    PartialAlias,
}

impl std::fmt::Display for AliasResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AliasResult::NoAlias => "NoAlias",
            AliasResult::MayAlias => "MayAlias",
            AliasResult::MustAlias => "MustAlias",
            AliasResult::PartialAlias => "PartialAlias",
        };
        write!(f, "{}", name)
    }
}

/// Abstract memory locations a value may reference. Targets are value ids
/// of allocation sites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsToSet {
    pub targets: BTreeSet<ValueId>,
    /// Set when the analysis lost precision for this value.
    pub unknown: bool,
}

impl PointsToSet {
    pub fn from_targets(targets: impl IntoIterator<Item = ValueId>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            unknown: false,
        }
    }

    pub fn unknown() -> Self {
        Self {
            targets: BTreeSet::new(),
            unknown: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && !self.unknown
    }

    pub fn overlaps(&self, other: &PointsToSet) -> bool {
        self.unknown || other.unknown || !self.targets.is_disjoint(&other.targets)
    }
}

/// Whole-program points-to result, one set per pointer-like value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointsToResult {
    points_to: HashMap<ValueId, PointsToSet>,
}

impl PointsToResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: ValueId, set: PointsToSet) {
        self.points_to.insert(value, set);
    }

    pub fn get(&self, value: ValueId) -> Option<&PointsToSet> {
        self.points_to.get(&value)
    }

    pub fn len(&self) -> usize {
        self.points_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_to.is_empty()
    }

    /// Alias query over the recorded sets. Values the analysis never saw
    /// answer `MayAlias`.
    pub fn alias(&self, a: ValueId, b: ValueId) -> AliasResult {
        if a == b {
            return AliasResult::MustAlias;
        }
        match (self.get(a), self.get(b)) {
            (Some(pts_a), Some(pts_b)) => {
                if pts_a.overlaps(pts_b) {
                    AliasResult::MayAlias
                } else {
                    AliasResult::NoAlias
                }
            }
            _ => AliasResult::MayAlias,
        }
    }
}

/// Pointer-analysis engine the driver calls into. The solver itself lives
/// outside this crate.
pub trait PointerEngine {
    fn name(&self) -> &'static str {
        "pointer-engine"
    }

    fn solve(&mut self, module: &Module) -> crate::Result<PointsToResult>;
}

/// Engine backed by a previously exported result. The artifact is handed
/// out exactly once; a second `solve` call fails.
#[derive(Debug)]
pub struct PrecomputedPointsTo {
    result: Option<PointsToResult>,
}

impl PrecomputedPointsTo {
    pub fn new(result: PointsToResult) -> Self {
        Self {
            result: Some(result),
        }
    }
}

impl PointerEngine for PrecomputedPointsTo {
    fn name(&self) -> &'static str {
        "precomputed-points-to"
    }

    fn solve(&mut self, _module: &Module) -> crate::Result<PointsToResult> {
        self.result
            .take()
            .ok_or_else(|| VflowError::EngineError("points-to artifact already consumed".into()))
    }
}
