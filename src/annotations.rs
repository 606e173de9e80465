//! Documentation and app-info annotations
//!
//! Any entity may carry human-readable documentation and machine-readable
//! app-info entries. They render in the annotation position defined by XSD,
//! as the first child of the owning element.

/// A human-readable documentation entry
#[derive(Debug, Clone, Default)]
pub struct Documentation {
    /// Documentation text
    pub text: String,
    /// Optional xml:lang
    pub lang: Option<String>,
    /// Optional source URI
    pub source: Option<String>,
}

impl Documentation {
    /// Create a documentation entry
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: None,
            source: None,
        }
    }

    /// Set the language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Set the source URI
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A machine-readable app-info entry
#[derive(Debug, Clone, Default)]
pub struct AppInfo {
    /// Raw content, emitted as text
    pub content: String,
    /// Optional source URI
    pub source: Option<String>,
}

impl AppInfo {
    /// Create an app-info entry
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
        }
    }

    /// Set the source URI
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Annotation block: an appendable list of documentation and app-info entries
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// Documentation entries, in attachment order
    pub documentation: Vec<Documentation>,
    /// App-info entries, in attachment order
    pub app_info: Vec<AppInfo>,
}

impl Annotation {
    /// Check whether the annotation carries any entry
    pub fn is_empty(&self) -> bool {
        self.documentation.is_empty() && self.app_info.is_empty()
    }
}

/// Capability trait for entities that carry annotations
pub trait Annotated {
    /// Mutable access to the annotation block
    fn annotation_mut(&mut self) -> &mut Annotation;

    /// Read access to the annotation block
    fn annotation(&self) -> &Annotation;

    /// Append a documentation entry
    fn document(&mut self, text: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        self.annotation_mut()
            .documentation
            .push(Documentation::new(text));
        self
    }

    /// Append an app-info entry
    fn app_info(&mut self, content: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        self.annotation_mut().app_info.push(AppInfo::new(content));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Annotatable {
        annotation: Annotation,
    }

    impl Annotated for Annotatable {
        fn annotation_mut(&mut self) -> &mut Annotation {
            &mut self.annotation
        }

        fn annotation(&self) -> &Annotation {
            &self.annotation
        }
    }

    #[test]
    fn test_annotation_appends_in_order() {
        let mut entity = Annotatable {
            annotation: Annotation::default(),
        };
        entity.document("first").document("second");
        entity.app_info("<meta/>");

        let texts: Vec<&str> = entity
            .annotation()
            .documentation
            .iter()
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(entity.annotation().app_info.len(), 1);
        assert!(!entity.annotation().is_empty());
    }

    #[test]
    fn test_documentation_builder() {
        let doc = Documentation::new("User lookup service")
            .with_lang("en")
            .with_source("https://example.com/docs");
        assert_eq!(doc.lang.as_deref(), Some("en"));
        assert!(doc.source.is_some());
    }
}
