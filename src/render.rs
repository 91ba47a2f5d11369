use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub const ASSETS_PATH_HELPER_NAME: &str = "assetsPath";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read view {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Template(#[from] handlebars::RenderError),
}

/// Renders Handlebars views from a directory on disk.
///
/// Views are read on every call, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    views_dir: PathBuf,
    assets: AssetsPathHelper,
}

impl HtmlRenderer {
    pub fn new(
        views_dir: impl Into<PathBuf>,
        assets_url_path: &str,
        assets_mapping: HashMap<String, String>,
    ) -> Self {
        Self {
            views_dir: views_dir.into(),
            assets: AssetsPathHelper {
                url_path: assets_url_path.to_owned(),
                mapping: Arc::new(assets_mapping),
            },
        }
    }

    pub fn render<T: Serialize>(&self, view: &str, data: &T) -> Result<String, RenderError> {
        let path = self.views_dir.join(view);
        let source = std::fs::read_to_string(&path).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;

        let mut registry = Handlebars::new();
        registry.register_helper(ASSETS_PATH_HELPER_NAME, Box::new(self.assets.clone()));

        Ok(registry.render_template(&source, data)?)
    }
}

#[derive(Debug, Clone)]
struct AssetsPathHelper {
    url_path: String,
    mapping: Arc<HashMap<String, String>>,
}

impl AssetsPathHelper {
    fn resolve(&self, logical: &str) -> String {
        let hashed = self.mapping.get(logical).map_or("", String::as_str);
        join_url(&self.url_path, hashed)
    }
}

impl HelperDef for AssetsPathHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let logical = h
            .param(0)
            .and_then(|param| param.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(
                ASSETS_PATH_HELPER_NAME,
                0,
            ))?;
        out.write(&self.resolve(logical))?;
        Ok(())
    }
}

fn join_url(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_owned(),
        (_, true) => prefix.to_owned(),
        _ => format!("{prefix}/{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"<html>
    <head><title>Testing</title></head>
    <body>
        {{ TestContent }}
        <script src={{ assetsPath "some_path/something.asset" }}></script>
    </body>
</html>"#;

    /// A scratch views directory, removed on drop.
    struct Views(PathBuf);

    impl Views {
        fn with_files(name: &str, files: &[(&str, &str)]) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("lucienne-views-{name}-{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            for (file, contents) in files {
                std::fs::write(dir.join(file), contents).unwrap();
            }
            Self(dir)
        }

        fn renderer(&self) -> HtmlRenderer {
            let mapping = HashMap::from([(
                "some_path/something.asset".to_owned(),
                "some_path/other_path/random.asset".to_owned(),
            )]);
            HtmlRenderer::new(&self.0, "/assets", mapping)
        }
    }

    impl Drop for Views {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn renders_data_and_asset_paths() {
        let views = Views::with_files("page", &[("test.html", PAGE)]);
        let html = views
            .renderer()
            .render("test.html", &json!({ "TestContent": "some content" }))
            .unwrap();

        assert!(html.contains("some content"));
        assert!(html.contains("<script src=/assets/some_path/other_path/random.asset></script>"));
    }

    #[test]
    fn missing_view_is_an_io_error() {
        let views = Views::with_files("missing", &[]);
        let err = views
            .renderer()
            .render("nope.html", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn broken_template_is_a_template_error() {
        let views = Views::with_files("broken", &[("broken.html", "{{#each authors}}oops")]);
        let err = views
            .renderer()
            .render("broken.html", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn scratch_views_are_removed_on_drop() {
        let views = Views::with_files("cleanup", &[("test.html", PAGE)]);
        let dir = views.0.clone();
        drop(views);
        assert!(!dir.exists());
    }

    #[test]
    fn asset_paths_join_like_url_paths() {
        assert_eq!(join_url("/assets", "js/app-X1.js"), "/assets/js/app-X1.js");
        assert_eq!(join_url("/assets/", "/js/app-X1.js"), "/assets/js/app-X1.js");
        assert_eq!(join_url("", "js/app-X1.js"), "js/app-X1.js");
        assert_eq!(join_url("/assets", ""), "/assets");
    }

    #[test]
    fn project_views_render() {
        let renderer = HtmlRenderer::new(
            concat!(env!("CARGO_MANIFEST_DIR"), "/views"),
            "/assets",
            HashMap::new(),
        );

        let html = renderer
            .render("authors/index.html", &json!({ "authors": [] }))
            .unwrap();
        assert!(html.contains("Nenhum autor encontrado"));

        let html = renderer.render("authors/new.html", &json!({})).unwrap();
        assert!(html.contains("<h3>Novo Autor</h3>"));
    }
}
