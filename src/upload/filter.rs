use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Extension allow-list applied to a selection before it reaches the sequencer.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
}

impl FileFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed == &ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Splits a selection into (supported, rejected), keeping order.
    pub fn partition(&self, files: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
        files.into_iter().partition(|f| self.is_supported_file(f))
    }

    /// Human-readable list of the allowed types. `jpeg` is spelled `JPG`.
    pub fn describe(&self) -> String {
        let mut names: Vec<String> = Vec::new();
        for ext in &self.extensions {
            let name = match ext.as_str() {
                "jpeg" => "JPG".to_string(),
                other => other.to_uppercase(),
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.join(" or ")
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_case_insensitively() {
        let filter = FileFilter::default();
        assert!(filter.is_supported_file(Path::new("scan.PNG")));
        assert!(filter.is_supported_file(Path::new("/home/me/card.jpeg")));
        assert!(!filter.is_supported_file(Path::new("letter.pdf")));
        assert!(!filter.is_supported_file(Path::new("README")));
    }

    #[test]
    fn partition_keeps_selection_order() {
        let filter = FileFilter::new([".png", "PDF"]);
        let (ok, rejected) = filter.partition(vec![
            PathBuf::from("b.png"),
            PathBuf::from("a.docx"),
            PathBuf::from("c.pdf"),
        ]);
        assert_eq!(ok, vec![PathBuf::from("b.png"), PathBuf::from("c.pdf")]);
        assert_eq!(rejected, vec![PathBuf::from("a.docx")]);
    }

    #[test]
    fn describes_allowed_types() {
        assert_eq!(FileFilter::default().describe(), "JPG or PNG");
        assert_eq!(FileFilter::new(["jpeg", "PNG"]).describe(), "JPG or PNG");
        assert_eq!(FileFilter::new(["webp"]).describe(), "WEBP");
    }
}
