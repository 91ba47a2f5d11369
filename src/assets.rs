use anyhow::Context;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where the compiled front-end assets live, plus the mapping from a logical
/// asset path to the hashed file the bundler produced for it.
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    compiled_full_path: PathBuf,
    mapping: HashMap<String, String>,
}

impl AssetsConfig {
    pub fn load(
        root: &Path,
        origin_path: &str,
        compiled_path: &str,
        build_file: &str,
    ) -> anyhow::Result<Self> {
        let origin_path = remove_ending_slash(origin_path);
        let compiled_path = remove_ending_slash(compiled_path);

        let mapping = load_mapping(&root.join(build_file), origin_path, compiled_path)?;

        Ok(Self {
            compiled_full_path: root.join(compiled_path),
            mapping,
        })
    }

    #[must_use]
    pub fn compiled_full_path(&self) -> &Path {
        &self.compiled_full_path
    }

    #[must_use]
    pub const fn mapping(&self) -> &HashMap<String, String> {
        &self.mapping
    }
}

fn load_mapping(
    build_file: &Path,
    origin_path: &str,
    compiled_path: &str,
) -> anyhow::Result<HashMap<String, String>> {
    let raw = std::fs::read_to_string(build_file)
        .with_context(|| format!("Failed to read assets build file {}", build_file.display()))?;
    let built: HashMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid assets build file {}", build_file.display()))?;

    let origin_prefix = format!("{origin_path}/");
    let compiled_prefix = format!("{compiled_path}/");

    Ok(built
        .into_iter()
        .map(|(key, val)| {
            (
                key.replace(&origin_prefix, ""),
                val.replace(&compiled_prefix, ""),
            )
        })
        .collect())
}

fn remove_ending_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_FILE: &str = r#"{
        "my_origin_assets/some_dir_1/some-file.js": "compiled/assets/some_dir_1/first-file-AJFJEO.js",
        "my_origin_assets/some_dir_2/another-file.scss": "compiled/assets/some_dir_2/another-css-AJITD2.css",
        "my_origin_assets/random-file.jpg": "compiled/assets/random-file-GDSJOQR.jpg"
    }"#;

    /// A scratch root holding a `build.json`, removed on drop.
    struct Root(PathBuf);

    impl Root {
        fn with_build_file(name: &str, contents: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "lucienne-assets-{name}-{}",
                std::process::id()
            ));
            std::fs::create_dir_all(&root).unwrap();
            std::fs::write(root.join("build.json"), contents).unwrap();
            Self(root)
        }
    }

    impl Drop for Root {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn expected_mapping() -> HashMap<String, String> {
        [
            ("some_dir_1/some-file.js", "some_dir_1/first-file-AJFJEO.js"),
            ("some_dir_2/another-file.scss", "some_dir_2/another-css-AJITD2.css"),
            ("random-file.jpg", "random-file-GDSJOQR.jpg"),
        ]
        .into_iter()
        .map(|(key, val)| (key.to_owned(), val.to_owned()))
        .collect()
    }

    #[test]
    fn paths_drop_ending_slash() {
        let root = Root::with_build_file("paths", BUILD_FILE);
        let assets =
            AssetsConfig::load(&root.0, "my_origin_assets/", "compiled/assets/", "build.json")
                .unwrap();

        assert_eq!(assets.compiled_full_path(), root.0.join("compiled/assets"));
        assert_eq!(assets.mapping(), &expected_mapping());
    }

    #[test]
    fn build_file_is_mapped_to_logical_paths() {
        let root = Root::with_build_file("mapping", BUILD_FILE);
        let assets =
            AssetsConfig::load(&root.0, "my_origin_assets", "compiled/assets", "build.json")
                .unwrap();

        assert_eq!(assets.mapping(), &expected_mapping());
    }

    #[test]
    fn missing_build_file_is_an_error() {
        let root = Root::with_build_file("missing", "{}");
        let err = AssetsConfig::load(&root.0, "assets", "public/assets", "nope.json").unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_build_file_is_an_error() {
        let root = Root::with_build_file("malformed", "not json");
        assert!(AssetsConfig::load(&root.0, "assets", "public/assets", "build.json").is_err());
    }

    #[test]
    fn scratch_root_is_removed_on_drop() {
        let root = Root::with_build_file("cleanup", "{}");
        let path = root.0.clone();
        drop(root);
        assert!(!path.exists());
    }
}
