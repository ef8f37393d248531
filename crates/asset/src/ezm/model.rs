use corelib::Skeleton;

use super::{EzmDocument, EzmSkeleton};
use crate::error::EzmError;

/// Document plus its resolved bone trees.
///
/// Either every skeleton builds or no model is produced.
#[derive(Clone, Debug)]
pub struct EzmModel {
    document: EzmDocument,
    // Parallel to `document.skeletons()`.
    skeletons: Vec<Skeleton>,
}

impl EzmModel {
    pub fn from_document(document: EzmDocument) -> Result<Self, EzmError> {
        let skeletons = document
            .skeletons()
            .iter()
            .map(|s| {
                s.build().inspect_err(|e| {
                    log::error!("Skeleton '{}' rejected: {e}", s.name());
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            document,
            skeletons,
        })
    }

    pub fn document(&self) -> &EzmDocument {
        &self.document
    }

    pub fn skeleton(&self, name: &str) -> Option<&Skeleton> {
        self.index_of(name).map(|i| &self.skeletons[i])
    }

    /// Mutable access for writing per-frame local transforms.
    pub fn skeleton_mut(&mut self, name: &str) -> Option<&mut Skeleton> {
        self.index_of(name).map(move |i| &mut self.skeletons[i])
    }

    /// Declared skeletons paired with their built trees.
    pub fn skeletons(&self) -> impl Iterator<Item = (&EzmSkeleton, &Skeleton)> {
        self.document.skeletons().iter().zip(&self.skeletons)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.document
            .skeletons()
            .iter()
            .position(|s| s.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Mat4, Pose, Vec3};

    #[test]
    fn builds_every_skeleton() {
        let doc = EzmDocument::parse_str(
            r#"<Skeletons>
                 <Skeleton name="a"><Bone name="r"/></Skeleton>
                 <Skeleton name="b"><Bone name="r"/><Bone name="c" parent="r" position="1 0 0"/></Skeleton>
               </Skeletons>"#,
        )
        .expect("parse");
        let mut model = EzmModel::from_document(doc).expect("model");
        assert_eq!(model.skeletons().count(), 2);
        assert_eq!(model.skeleton("b").unwrap().len(), 2);

        let b = model.skeleton_mut("b").unwrap();
        let root = b.root();
        b.set_local_transform(root, Mat4::from_translation(Vec3::Y));
        let sk = model.skeleton("b").unwrap();
        let c = Pose::compute(sk).world_of(sk, "c").unwrap();
        assert!(c.abs_diff_eq(Mat4::from_translation(Vec3::new(1.0, 1.0, 0.0)), 1e-6));
    }

    #[test]
    fn one_bad_skeleton_rejects_the_model() {
        let doc = EzmDocument::parse_str(
            r#"<Skeletons>
                 <Skeleton name="ok"><Bone name="r"/></Skeleton>
                 <Skeleton name="bad"><Bone name="x" parent="missing"/></Skeleton>
               </Skeletons>"#,
        )
        .expect("parse");
        let err = EzmModel::from_document(doc).unwrap_err();
        assert!(matches!(err, EzmError::Hierarchy(_)));
    }
}
