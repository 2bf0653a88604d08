//! Markup tags.
//!
//! Singleton, paired, fragment and component tags share one shape.

use crate::ExprId;

use super::TemplatePart;

#[derive(Clone, Debug, PartialEq)]
pub struct TagNode {
    /// Tag name; empty for fragments.
    pub name: String,
    pub attrs: Vec<TagAttr>,
    /// Text runs and interpolations; nested tags appear as `TemplatePart::Expr`.
    pub children: Vec<TemplatePart>,
    pub self_closing: bool,
    pub kind: TagKind,
}

impl TagNode {
    /// Uppercase tags call the function of the same name.
    pub fn is_component(&self) -> bool {
        matches!(self.kind, TagKind::Component)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TagKind {
    /// Lowercase tag rendered to markup
    Element,
    /// Uppercase tag calling a function
    Component,
    /// `<>...</>`
    Fragment,
    /// `<!DOCTYPE html>`, `<?xml ...?>`; raw text between the angle brackets
    Directive(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagAttr {
    pub name: String,
    pub value: TagAttrValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TagAttrValue {
    /// Bare attribute: `<input disabled>`
    Flag,
    /// `attr="text {interp}"`
    Text(Vec<TemplatePart>),
    /// `attr={expr}`
    Expr(ExprId),
}
