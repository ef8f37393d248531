//! Bone hierarchy: flat, name-referenced declarations resolved into an arena tree.
//!
//! Nodes live in a single `Vec` owned by [`Skeleton`] and are addressed by
//! [`BoneId`], which is the bone's declaration index. A node's parent link is a
//! plain id used for lookups; only the arena owns nodes.

use std::collections::HashMap;

use crate::Mat4;
use crate::error::{HierarchyError, HierarchyResult};
use crate::pose::compose_pre_order;

/// Index of a bone inside its [`Skeleton`] (declaration order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One joint as declared in a source file, before tree construction.
#[derive(Clone, Debug, PartialEq)]
pub struct BoneDefinition {
    pub name: String,
    /// Rest transform relative to the parent bone.
    pub bind_pose_offset: Mat4,
    pub parent: Option<String>,
}

impl BoneDefinition {
    /// An empty parent name is treated as "no parent".
    pub fn new(name: impl Into<String>, bind_pose_offset: Mat4, parent: Option<String>) -> Self {
        Self {
            name: name.into(),
            bind_pose_offset,
            parent: parent.filter(|p| !p.is_empty()),
        }
    }

    pub fn root(name: impl Into<String>, bind_pose_offset: Mat4) -> Self {
        Self::new(name, bind_pose_offset, None)
    }

    pub fn child(
        name: impl Into<String>,
        parent: impl Into<String>,
        bind_pose_offset: Mat4,
    ) -> Self {
        Self::new(name, bind_pose_offset, Some(parent.into()))
    }

    #[inline]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }
}

/// Runtime tree node.
#[derive(Clone, Debug)]
pub struct BoneNode {
    name: String,
    bind_pose_offset: Mat4,
    local_transform: Mat4,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
}

impl BoneNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bind_pose_offset(&self) -> Mat4 {
        self.bind_pose_offset
    }

    /// Current pose relative to the parent. Starts at the bind pose.
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Resolved bone tree with exactly one root.
#[derive(Clone, Debug)]
pub struct Skeleton {
    nodes: Vec<BoneNode>,
    root: BoneId,
    by_name: HashMap<String, BoneId>,
    inverse_bind: Vec<Mat4>,
}

impl Skeleton {
    /// Resolve parent names and build the tree.
    ///
    /// Children keep the declaration order of their definitions, and a child
    /// may be declared before its parent.
    pub fn build(defs: &[BoneDefinition]) -> HierarchyResult<Self> {
        let mut by_name: HashMap<String, BoneId> = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if by_name.insert(def.name.clone(), BoneId(i as u32)).is_some() {
                return Err(HierarchyError::DuplicateBone(def.name.clone()));
            }
        }

        let mut parents: Vec<Option<BoneId>> = Vec::with_capacity(defs.len());
        for def in defs {
            let parent = match def.parent_name() {
                None => None,
                Some(parent) => Some(*by_name.get(parent).ok_or_else(|| {
                    HierarchyError::MissingParent {
                        bone: def.name.clone(),
                        parent: parent.to_owned(),
                    }
                })?),
            };
            parents.push(parent);
        }

        let mut roots = parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| i);
        let root = match (roots.next(), roots.next()) {
            (None, _) => return Err(HierarchyError::NoRoot),
            (Some(first), Some(second)) => {
                return Err(HierarchyError::MultipleRoots {
                    first: defs[first].name.clone(),
                    second: defs[second].name.clone(),
                });
            }
            (Some(root), None) => BoneId(root as u32),
        };

        let mut nodes: Vec<BoneNode> = defs
            .iter()
            .zip(&parents)
            .map(|(def, &parent)| BoneNode {
                name: def.name.clone(),
                bind_pose_offset: def.bind_pose_offset,
                local_transform: def.bind_pose_offset,
                parent,
                children: Vec::new(),
            })
            .collect();
        for (i, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                nodes[parent.index()].children.push(BoneId(i as u32));
            }
        }

        // Every non-root bone has a resolved parent, so anything the root
        // cannot reach hangs off a parent cycle.
        let mut reached = vec![false; nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut reached[id.index()], true) {
                continue;
            }
            stack.extend_from_slice(&nodes[id.index()].children);
        }
        if let Some(stray) = reached.iter().position(|r| !r) {
            let on_cycle = cycle_member(&parents, stray);
            return Err(HierarchyError::Cycle {
                bone: defs[on_cycle].name.clone(),
            });
        }

        let mut skeleton = Self {
            nodes,
            root,
            by_name,
            inverse_bind: Vec::new(),
        };
        let mut bind_world = Vec::new();
        compose_pre_order(&skeleton, BoneNode::bind_pose_offset, &mut bind_world);
        skeleton.inverse_bind = bind_world.iter().map(Mat4::inverse).collect();

        log::debug!(
            "Built skeleton with {} bones, root '{}'",
            skeleton.len(),
            skeleton.node(root).name()
        );
        Ok(skeleton)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a built skeleton.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn root(&self) -> BoneId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: BoneId) -> &BoneNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: BoneId) -> Option<&BoneNode> {
        self.nodes.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.by_name.get(name).copied()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (BoneId, &BoneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (BoneId(i as u32), node))
    }

    /// Inverse of each bone's bind-pose world transform, indexed by [`BoneId`].
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind
    }

    #[inline]
    pub fn inverse_bind(&self, id: BoneId) -> Mat4 {
        self.inverse_bind[id.index()]
    }

    pub fn set_local_transform(&mut self, id: BoneId, local: Mat4) {
        self.nodes[id.index()].local_transform = local;
    }

    /// Returns `false` if no bone has that name.
    pub fn set_local_transform_by_name(&mut self, name: &str, local: Mat4) -> bool {
        match self.find(name) {
            Some(id) => {
                self.set_local_transform(id, local);
                true
            }
            None => false,
        }
    }

    pub fn reset_to_bind_pose(&mut self) {
        for node in &mut self.nodes {
            node.local_transform = node.bind_pose_offset;
        }
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: BoneId) -> usize {
        let mut depth = 0;
        let mut cur = self.node(id).parent;
        while let Some(parent) = cur {
            depth += 1;
            cur = self.node(parent).parent;
        }
        depth
    }

    /// Pre-order walk from the root, children in declaration order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            skeleton: self,
            stack: vec![self.root],
        }
    }
}

/// Iterator returned by [`Skeleton::depth_first`].
pub struct DepthFirst<'a> {
    skeleton: &'a Skeleton,
    stack: Vec<BoneId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = BoneId;

    fn next(&mut self) -> Option<BoneId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.skeleton.node(id).children.iter().rev().copied());
        Some(id)
    }
}

/// Follow parent links from `start` until a bone repeats.
fn cycle_member(parents: &[Option<BoneId>], start: usize) -> usize {
    let mut seen = vec![false; parents.len()];
    let mut cur = start;
    while !seen[cur] {
        seen[cur] = true;
        match parents[cur] {
            Some(parent) => cur = parent.index(),
            None => break,
        }
    }
    cur
}
