use roxmltree::Node;

use super::is_tag;

/// Named material with an opaque metadata string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EzmMaterial {
    name: String,
    meta_data: String,
}

impl EzmMaterial {
    pub const TAG: &'static str = "Material";

    // <Material name="character_anim:eyeBallM" meta_data="diffuse=%20upBodyC.jpg%20"/>
    /// `None` unless `node` is a `<Material>` element. Attribute values are
    /// copied verbatim; absent ones stay empty.
    pub fn parse(node: Node<'_, '_>) -> Option<Self> {
        if !is_tag(node, Self::TAG) {
            return None;
        }
        let mut result = Self::default();
        if let Some(name) = node.attribute("name") {
            result.name = name.to_owned();
        }
        if let Some(meta_data) = node.attribute("meta_data") {
            result.meta_data = meta_data.to_owned();
        }
        Some(result)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta_data(&self) -> &str {
        &self.meta_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(src: &str) -> Option<EzmMaterial> {
        let doc = roxmltree::Document::parse(src).expect("xml");
        EzmMaterial::parse(doc.root_element())
    }

    #[test]
    fn copies_attributes_verbatim() {
        let m = parse_one(
            r#"<Material name="character_anim:eyeBallM" meta_data="diffuse=%20upBodyC.jpg%20"/>"#,
        )
        .expect("material");
        assert_eq!(m.name(), "character_anim:eyeBallM");
        assert_eq!(m.meta_data(), "diffuse=%20upBodyC.jpg%20");
    }

    #[test]
    fn other_tags_are_not_materials() {
        assert!(parse_one(r#"<Bone name="x" meta_data="y"/>"#).is_none());
        assert!(parse_one(r#"<material name="lowercase"/>"#).is_none());
    }

    #[test]
    fn missing_meta_data_stays_empty() {
        let m = parse_one(r#"<Material name="skin"/>"#).expect("material");
        assert_eq!(m.name(), "skin");
        assert_eq!(m.meta_data(), "");

        let bare = parse_one("<Material/>").expect("material");
        assert_eq!(bare, EzmMaterial::default());
    }
}
