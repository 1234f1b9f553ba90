//! Upload path generation for recipe images

use std::sync::Arc;

use crate::adapters::identifier::RandomIdentifier;
use crate::domain::Recipe;
use crate::ports::IdentifierSource;

/// Directory (relative to the media root) holding recipe images
pub const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";

/// Builds storage paths for uploaded recipe images
///
/// Paths look like `uploads/recipe/<identifier>.<extension>`, where the
/// identifier comes from the injected [`IdentifierSource`] and the
/// extension is whatever follows the last `.` of the original filename.
#[derive(Clone)]
pub struct UploadPathGenerator {
    ids: Arc<dyn IdentifierSource>,
}

impl UploadPathGenerator {
    pub fn new(ids: Arc<dyn IdentifierSource>) -> Self {
        Self { ids }
    }

    /// Generator backed by random UUIDs
    pub fn random() -> Self {
        Self::new(Arc::new(RandomIdentifier))
    }

    /// Path for a newly uploaded recipe image
    ///
    /// `_instance` is the recipe the image belongs to; it does not affect the
    /// path. Only the final component of `original_filename` is considered,
    /// so the extension never carries a path separator. A name without `.`
    /// is used whole as the extension.
    pub fn recipe_image_file_path(
        &self,
        _instance: Option<&Recipe>,
        original_filename: &str,
    ) -> String {
        let name = original_filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_filename);
        let ext = name.rsplit('.').next().unwrap_or(name);
        format!("{}/{}.{}", RECIPE_UPLOAD_DIR, self.ids.next_identifier(), ext)
    }
}

impl Default for UploadPathGenerator {
    fn default() -> Self {
        Self::random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identifier::FixedIdentifier;

    fn fixed(id: &str) -> UploadPathGenerator {
        UploadPathGenerator::new(Arc::new(FixedIdentifier::new(id)))
    }

    #[test]
    fn test_recipe_file_name_uuid() {
        let generator = fixed("test-uuid");
        let path = generator.recipe_image_file_path(None, "myimage.jpg");
        assert_eq!(path, "uploads/recipe/test-uuid.jpg");
    }

    #[test]
    fn test_uses_last_extension() {
        let generator = fixed("abc");
        assert_eq!(
            generator.recipe_image_file_path(None, "archive.tar.gz"),
            "uploads/recipe/abc.gz"
        );
        assert_eq!(
            generator.recipe_image_file_path(None, "noext"),
            "uploads/recipe/abc.noext"
        );
    }

    #[test]
    fn test_extension_never_contains_separators() {
        let generator = fixed("id");
        assert_eq!(
            generator.recipe_image_file_path(None, "evil.jpg/../../x"),
            "uploads/recipe/id.x"
        );
        assert_eq!(
            generator.recipe_image_file_path(None, "photos/cake.png"),
            "uploads/recipe/id.png"
        );
        assert_eq!(
            generator.recipe_image_file_path(None, "C:\\pics\\pie.jpeg"),
            "uploads/recipe/id.jpeg"
        );
        for name in ["a.b/c", "x.y\\z.gif", "dir.v2/"] {
            let path = generator.recipe_image_file_path(None, name);
            let file = path.strip_prefix("uploads/recipe/").unwrap();
            assert!(!file.contains('/') && !file.contains('\\'), "{}", path);
        }
    }

    #[test]
    fn test_random_paths_differ() {
        let generator = UploadPathGenerator::random();
        let a = generator.recipe_image_file_path(None, "a.png");
        let b = generator.recipe_image_file_path(None, "a.png");
        assert_ne!(a, b);
        assert!(a.starts_with("uploads/recipe/"));
        assert!(a.ends_with(".png"));
    }
}
