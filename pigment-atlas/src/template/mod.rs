//! Page rendering
//!
//! Pages are rendered by name from a JSON binding object. The built-in
//! Handlebars templates live in `templates/` and are compiled into the
//! binary; a configured directory may override any of them.

use handlebars::Handlebars;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::{AtlasError, Result};

/// Templates a site is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    /// `index.html`
    ManufacturerIndex,
    /// `paints/<manufacturer>/index.html`
    PaintIndex,
    /// `paints/<manufacturer>/<paint>.html`
    PaintDetail,
    /// `pigments/index.html`
    PigmentIndex,
    /// `pigments/<code>-<name>.html`
    PigmentDetail,
}

impl TemplateId {
    /// Every template, in registration order
    pub const ALL: [Self; 5] = [
        Self::ManufacturerIndex,
        Self::PaintIndex,
        Self::PaintDetail,
        Self::PigmentIndex,
        Self::PigmentDetail,
    ];

    /// Registered name, also the override file stem
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ManufacturerIndex => "manufacturer_index",
            Self::PaintIndex => "paint_index",
            Self::PaintDetail => "paint_detail",
            Self::PigmentIndex => "pigment_index",
            Self::PigmentDetail => "pigment_detail",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::ManufacturerIndex => include_str!("../../templates/manufacturer_index.hbs"),
            Self::PaintIndex => include_str!("../../templates/paint_index.hbs"),
            Self::PaintDetail => include_str!("../../templates/paint_detail.hbs"),
            Self::PigmentIndex => include_str!("../../templates/pigment_index.hbs"),
            Self::PigmentDetail => include_str!("../../templates/pigment_detail.hbs"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Partials shared by every page
const PARTIALS: [(&str, &str); 2] = [
    ("header", include_str!("../../templates/partials/header.hbs")),
    ("footer", include_str!("../../templates/partials/footer.hbs")),
];

/// Turns a template name and bindings into page text
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    /// Render `template` with `bindings`
    fn render(&self, template: TemplateId, bindings: &serde_json::Value) -> Result<String>;
}

/// [`Renderer`] backed by Handlebars
///
/// Strict mode is on, so a binding the template expects but the page
/// context lacks is a render error instead of an empty string. Output is
/// HTML-escaped.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl fmt::Debug for HandlebarsRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlebarsRenderer").finish_non_exhaustive()
    }
}

impl HandlebarsRenderer {
    /// Renderer with the built-in templates
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        for (name, source) in PARTIALS {
            registry
                .register_partial(name, source)
                .map_err(|e| AtlasError::Template(format!("partial {name}: {e}")))?;
        }
        for template in TemplateId::ALL {
            registry
                .register_template_string(template.name(), template.source())
                .map_err(|e| AtlasError::Template(format!("template {template}: {e}")))?;
        }

        Ok(Self { registry })
    }

    /// Renderer with the built-in templates, replacing any for which
    /// `dir` holds a `<name>.hbs` (partials live in `dir/partials/`)
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AtlasError::Config(format!(
                "template directory {} does not exist",
                dir.display()
            )));
        }

        let mut renderer = Self::new()?;

        for (name, _) in PARTIALS {
            let path = dir.join("partials").join(format!("{name}.hbs"));
            if path.is_file() {
                let source = std::fs::read_to_string(&path)?;
                renderer
                    .registry
                    .register_partial(name, source)
                    .map_err(|e| AtlasError::Template(format!("{}: {e}", path.display())))?;
                tracing::debug!(partial = name, path = %path.display(), "partial overridden");
            }
        }
        for template in TemplateId::ALL {
            let path = dir.join(format!("{}.hbs", template.name()));
            if path.is_file() {
                renderer
                    .registry
                    .register_template_file(template.name(), &path)
                    .map_err(|e| AtlasError::Template(format!("{}: {e}", path.display())))?;
                tracing::debug!(%template, path = %path.display(), "template overridden");
            }
        }

        Ok(renderer)
    }
}

impl Renderer for HandlebarsRenderer {
    fn render(&self, template: TemplateId, bindings: &serde_json::Value) -> Result<String> {
        self.registry
            .render(template.name(), bindings)
            .map_err(|e| AtlasError::Render {
                template: template.name().to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn chrome() -> serde_json::Value {
        json!({
            "page_title": "Manufacturers",
            "site_title": "Watercolor Pigments",
            "home_href": "/index.html",
            "pigment_index_href": "/pigments/index.html",
            "stylesheet_href": null,
        })
    }

    fn with_chrome(mut bindings: serde_json::Value) -> serde_json::Value {
        if let (Some(target), Some(chrome)) = (bindings.as_object_mut(), chrome().as_object()) {
            for (key, value) in chrome {
                target.insert(key.clone(), value.clone());
            }
        }
        bindings
    }

    #[test]
    fn test_builtin_templates_register() {
        HandlebarsRenderer::new().unwrap();
    }

    #[test]
    fn test_render_manufacturer_index() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let html = renderer
            .render(
                TemplateId::ManufacturerIndex,
                &with_chrome(json!({
                    "manufacturers": [
                        {"name": "Acme", "href": "/paints/acme/index.html", "paint_count": 2}
                    ]
                })),
            )
            .unwrap();
        assert!(html.contains(r#"<a href="/paints/acme/index.html">Acme</a>"#));
        assert!(html.contains("<title>Manufacturers"));
    }

    #[test]
    fn test_output_is_escaped() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let html = renderer
            .render(
                TemplateId::ManufacturerIndex,
                &with_chrome(json!({
                    "manufacturers": [
                        {"name": "M<script>", "href": "/paints/m-script/index.html", "paint_count": 1}
                    ]
                })),
            )
            .unwrap();
        assert!(html.contains("M&lt;script&gt;"));
        assert!(!html.contains("M<script>"));
    }

    #[test]
    fn test_missing_binding_is_a_render_error() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let err = renderer
            .render(TemplateId::PaintDetail, &with_chrome(json!({"paint_name": "Red"})))
            .unwrap_err();
        assert!(matches!(err, AtlasError::Render { ref template, .. } if template == "paint_detail"));
    }

    #[test]
    fn test_override_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pigment_index.hbs"),
            "{{#each pigments}}{{code}};{{/each}}",
        )
        .unwrap();

        let renderer = HandlebarsRenderer::with_overrides(temp.path()).unwrap();
        let html = renderer
            .render(
                TemplateId::PigmentIndex,
                &json!({"pigments": [{"code": "PB29"}, {"code": "PR101"}]}),
            )
            .unwrap();
        assert_eq!(html, "PB29;PR101;");
    }

    #[test]
    fn test_override_directory_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = HandlebarsRenderer::with_overrides(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
    }
}
