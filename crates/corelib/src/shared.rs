//! Skeleton shared between a pose writer and renderers on other threads.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::Mat4;
use crate::pose::Pose;
use crate::skeleton::Skeleton;

/// Writers take the lock for a whole frame update and traversals take it for
/// a whole walk, so a pose never mixes two frames.
#[derive(Clone, Debug)]
pub struct SharedSkeleton {
    inner: Arc<RwLock<Skeleton>>,
}

impl SharedSkeleton {
    pub fn new(skeleton: Skeleton) -> Self {
        Self {
            inner: Arc::new(RwLock::new(skeleton)),
        }
    }

    /// Apply a batch of local-transform updates atomically.
    pub fn update<R>(&self, f: impl FnOnce(&mut Skeleton) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    pub fn compute_pose(&self) -> Pose {
        Pose::compute(&self.inner.read())
    }

    /// Recompute into `pose` and fill `palette` under the same read lock.
    pub fn compute_palette(&self, pose: &mut Pose, palette: &mut Vec<Mat4>) {
        let guard = self.inner.read();
        pose.recompute(&guard);
        pose.write_palette(&guard, palette);
    }

    /// Owned copy of the current skeleton state.
    pub fn snapshot(&self) -> Skeleton {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;
    use crate::skeleton::BoneDefinition;

    #[test]
    fn updates_are_visible_to_later_traversals() {
        let shared = SharedSkeleton::new(
            Skeleton::build(&[
                BoneDefinition::root("A", Mat4::IDENTITY),
                BoneDefinition::child("B", "A", Mat4::IDENTITY),
            ])
            .expect("build"),
        );
        let reader = shared.clone();
        let handle = std::thread::spawn(move || {
            reader.update(|sk| {
                let root = sk.root();
                sk.set_local_transform(root, Mat4::from_translation(Vec3::Y));
            })
        });
        handle.join().expect("writer thread");

        let mut pose = Pose::default();
        let mut palette = Vec::new();
        shared.compute_palette(&mut pose, &mut palette);
        let sk = shared.snapshot();
        let b = pose.world_of(&sk, "B").unwrap();
        assert!(b.abs_diff_eq(Mat4::from_translation(Vec3::Y), 1e-6));
        assert!(palette[1].abs_diff_eq(Mat4::from_translation(Vec3::Y), 1e-6));
        assert_eq!(shared.compute_pose(), pose);
    }
}
