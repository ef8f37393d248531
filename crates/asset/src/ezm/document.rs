use roxmltree::Node;

use super::{EzmMaterial, EzmMesh, EzmSkeleton};
use crate::error::{EzmError, FormatError};

/// Parsed EZM file. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EzmDocument {
    asset_name: String,
    asset_info: String,
    materials: Vec<EzmMaterial>,
    skeletons: Vec<EzmSkeleton>,
    meshes: Vec<EzmMesh>,
}

impl EzmDocument {
    /// Parse EZM markup. Any malformed record aborts the whole document.
    pub fn parse_str(text: &str) -> Result<Self, EzmError> {
        let xml = roxmltree::Document::parse(text)?;
        Ok(Self::from_xml(&xml)?)
    }

    pub fn from_xml(xml: &roxmltree::Document<'_>) -> Result<Self, FormatError> {
        let root = xml.root_element();
        let mut doc = Self {
            asset_name: root.attribute("asset_name").unwrap_or_default().to_owned(),
            asset_info: root.attribute("asset_info").unwrap_or_default().to_owned(),
            ..Self::default()
        };
        doc.visit(root)?;
        doc.check_bindings()?;
        Ok(doc)
    }

    fn visit(&mut self, node: Node<'_, '_>) -> Result<(), FormatError> {
        if let Some(material) = EzmMaterial::parse(node) {
            self.materials.push(material);
        } else if let Some(skeleton) = EzmSkeleton::parse(node)? {
            log::debug!(
                "Parsed skeleton '{}' with {} bones",
                skeleton.name(),
                skeleton.bones().len()
            );
            self.skeletons.push(skeleton);
        } else if let Some(mesh) = EzmMesh::parse(node)? {
            self.meshes.push(mesh);
        } else {
            log::trace!("Skipping <{}>", node.tag_name().name());
            for child in node.children().filter(|n| n.is_element()) {
                self.visit(child)?;
            }
        }
        Ok(())
    }

    /// Every bound mesh must name a parsed skeleton and stay within its bones.
    fn check_bindings(&self) -> Result<(), FormatError> {
        for mesh in self.meshes.iter().filter(|m| !m.skeleton().is_empty()) {
            let skeleton = self.skeleton(mesh.skeleton()).ok_or_else(|| {
                FormatError::UnresolvedSkeleton {
                    mesh: mesh.name().to_owned(),
                    skeleton: mesh.skeleton().to_owned(),
                }
            })?;
            let bone_count = skeleton.bones().len();
            if let Some(index) = mesh.data().max_bone_id() {
                if usize::from(index) >= bone_count {
                    return Err(FormatError::BoneIndexOutOfRange {
                        mesh: mesh.name().to_owned(),
                        index,
                        bone_count,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    pub fn asset_info(&self) -> &str {
        &self.asset_info
    }

    pub fn materials(&self) -> &[EzmMaterial] {
        &self.materials
    }

    pub fn skeletons(&self) -> &[EzmSkeleton] {
        &self.skeletons
    }

    pub fn meshes(&self) -> &[EzmMesh] {
        &self.meshes
    }

    /// First material with this name; names are not required to be unique.
    pub fn material(&self, name: &str) -> Option<&EzmMaterial> {
        self.materials.iter().find(|m| m.name() == name)
    }

    pub fn skeleton(&self, name: &str) -> Option<&EzmSkeleton> {
        self.skeletons.iter().find(|s| s.name() == name)
    }

    pub fn mesh(&self, name: &str) -> Option<&EzmMesh> {
        self.meshes.iter().find(|m| m.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"<?xml version="1.0"?>
        <MeshSystem asset_name="character" asset_info="exported">
          <Skeletons count="1">
            <Skeleton name="rig">
              <Bone name="hand" parent="arm" position="0 0.5 0"/>
              <Bone name="root"/>
              <Bone name="arm" parent="root" position="0 1 0" orientation="0 0 0 1"/>
            </Skeleton>
          </Skeletons>
          <Animations count="1">
            <Animation name="wave" track_count="1">
              <AnimTrack name="arm" count="2">0 0 0</AnimTrack>
            </Animation>
          </Animations>
          <Materials count="2">
            <Material name="character_anim:eyeBallM" meta_data="diffuse=%20upBodyC.jpg%20"/>
            <Material name="character_anim:eyeBallM"/>
          </Materials>
          <Meshes count="1">
            <Mesh name="body" skeleton="rig">
              <MeshVertices count="3" semantic="position blendindices blendweights">
                0 0 0  0 0 0 0  1 0 0 0
                1 0 0  2 0 0 0  1 0 0 0
                0 1 0  1 2 0 0  0.5 0.5 0 0
              </MeshVertices>
              <MeshSubMesh material="character_anim:eyeBallM" count="1">0 1 2</MeshSubMesh>
            </Mesh>
          </Meshes>
        </MeshSystem>"#;

    #[test]
    fn parses_full_scene() {
        let doc = EzmDocument::parse_str(SCENE).expect("parse");
        assert_eq!(doc.asset_name(), "character");
        assert_eq!(doc.asset_info(), "exported");
        assert_eq!(doc.materials().len(), 2);
        assert_eq!(doc.materials()[1].meta_data(), "");
        assert_eq!(
            doc.material("character_anim:eyeBallM").unwrap().meta_data(),
            "diffuse=%20upBodyC.jpg%20"
        );
        let rig = doc.skeleton("rig").expect("rig");
        assert_eq!(rig.bones().len(), 3);
        assert_eq!(doc.mesh("body").unwrap().data().vertices.len(), 3);
    }

    #[test]
    fn root_record_is_parsed() {
        let doc = EzmDocument::parse_str(r#"<Material name="solo"/>"#).expect("parse");
        assert_eq!(doc.materials()[0].name(), "solo");
    }

    #[test]
    fn malformed_bone_aborts_document() {
        let src = r#"<MeshSystem>
            <Materials><Material name="kept?"/></Materials>
            <Skeleton name="s"><Bone name="a" scale="1 1 x"/></Skeleton>
        </MeshSystem>"#;
        let err = EzmDocument::parse_str(src).unwrap_err();
        assert!(matches!(
            err,
            EzmError::Format(FormatError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn zero_weight_bone_index_is_still_checked() {
        let src = r#"<MeshSystem>
            <Skeleton name="rig"><Bone name="only"/></Skeleton>
            <Mesh name="m" skeleton="rig">
              <MeshVertices count="1" semantic="position blendindices blendweights">0 0 0 200 0 0 0 0 1 0 0</MeshVertices>
            </Mesh>
        </MeshSystem>"#;
        let err = EzmDocument::parse_str(src).unwrap_err();
        assert!(matches!(
            err,
            EzmError::Format(FormatError::BoneIndexOutOfRange { index: 200, .. })
        ));
    }

    #[test]
    fn broken_markup_is_an_xml_error() {
        let err = EzmDocument::parse_str("<MeshSystem><Material></MeshSystem>").unwrap_err();
        assert!(matches!(err, EzmError::Xml(_)));
    }

    #[test]
    fn mesh_bound_to_missing_skeleton_fails() {
        let src = r#"<Meshes><Mesh name="m" skeleton="nope"/></Meshes>"#;
        let err = EzmDocument::parse_str(src).unwrap_err();
        assert!(matches!(
            err,
            EzmError::Format(FormatError::UnresolvedSkeleton { .. })
        ));
    }

    #[test]
    fn bone_index_beyond_skeleton_fails() {
        let src = r#"<MeshSystem>
            <Skeleton name="rig"><Bone name="only"/></Skeleton>
            <Mesh name="m" skeleton="rig">
              <MeshVertices count="1" semantic="position blendindices blendweights">0 0 0 3 0 0 0 1 0 0 0</MeshVertices>
            </Mesh>
        </MeshSystem>"#;
        let err = EzmDocument::parse_str(src).unwrap_err();
        match err {
            EzmError::Format(FormatError::BoneIndexOutOfRange {
                index, bone_count, ..
            }) => {
                assert_eq!(index, 3);
                assert_eq!(bone_count, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
