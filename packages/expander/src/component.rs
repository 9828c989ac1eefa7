use crate::error::{RenderError, ResolveError};
use htmlc_dom::Attributes;
use std::fmt::Write;

/// Writes the raw template markup of one component occurrence
pub trait Renderer {
    fn render(&self, out: &mut dyn Write) -> Result<(), RenderError>;

    /// Problems noticed while resolving, e.g. missing required props
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Maps a tag and its attributes to a renderer
pub trait ComponentResolver {
    fn resolve(&self, tag: &str, attributes: &Attributes)
        -> Result<Box<dyn Renderer + '_>, ResolveError>;
}

impl<F> ComponentResolver for F
where
    F: Fn(&str, &Attributes) -> Result<Box<dyn Renderer>, ResolveError>,
{
    fn resolve(
        &self,
        tag: &str,
        attributes: &Attributes,
    ) -> Result<Box<dyn Renderer + '_>, ResolveError> {
        self(tag, attributes)
    }
}

/// Renderer for fixed markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMarkup(pub String);

impl StaticMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn boxed(markup: impl Into<String>) -> Box<dyn Renderer> {
        Box::new(Self::new(markup))
    }
}

impl Renderer for StaticMarkup {
    fn render(&self, out: &mut dyn Write) -> Result<(), RenderError> {
        out.write_str(&self.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_resolver() {
        let resolver = |tag: &str, _: &Attributes| -> Result<Box<dyn Renderer>, ResolveError> {
            match tag {
                "Greeting" => Ok(StaticMarkup::boxed("<p>hi</p>")),
                _ => Err(ResolveError::not_found(tag)),
            }
        };

        let renderer = resolver.resolve("Greeting", &Attributes::new()).unwrap();
        let mut out = String::new();
        renderer.render(&mut out).unwrap();
        assert_eq!(out, "<p>hi</p>");

        assert!(matches!(
            resolver.resolve("Missing", &Attributes::new()),
            Err(ResolveError::NotFound { .. })
        ));
    }
}
