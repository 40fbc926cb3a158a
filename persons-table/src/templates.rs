//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and parsed once, on first use.

use axum::http::StatusCode;
use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use serde::Serialize;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in [
        ("base.html", include_str!("../templates/base.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("person.html", include_str!("../templates/person.html")),
        ("person_form.html", include_str!("../templates/person_form.html")),
        ("error.html", include_str!("../templates/error.html")),
    ] {
        env.add_template(name, source)
            .unwrap_or_else(|e| panic!("Failed to parse embedded template {name}: {e}"));
    }
    env
});

/// Render the named template with the given context
pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    TEMPLATES.get_template(name)?.render(ctx)
}

pub fn render_error(status: StatusCode, message: &str) -> Result<String, minijinja::Error> {
    render(
        "error.html",
        context! {
            status => status.as_u16(),
            reason => status.canonical_reason().unwrap_or("Error"),
            message => message,
        },
    )
}
