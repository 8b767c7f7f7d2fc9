//! Request-scoped navigation trail. Built per request and serialized into
//! the response body; never shared or persisted.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Breadcrumbs(Vec<Breadcrumb>);

impl Breadcrumbs {
    /// Trail seeded with the collection root.
    pub fn for_uploads() -> Self {
        let mut trail = Self::default();
        trail.push("Uploaded Files", Some("/uploaded_files".to_string()));
        trail
    }

    pub fn push(&mut self, label: impl Into<String>, href: Option<String>) {
        self.0.push(Breadcrumb {
            label: label.into(),
            href,
        });
    }

    pub fn entries(&self) -> &[Breadcrumb] {
        &self.0
    }
}
