//! Markup tags.
//!
//! Lowercase tags render to a string of markup. Uppercase tags call the
//! function of that name with one dictionary argument: the attributes plus
//! `contents`, the rendered children (null for a self-closing tag).

use std::sync::Arc;

use quill_ir::{Span, TagAttrValue, TagKind, TagNode};

use super::Interpreter;
use crate::builtins::CallSite;
use crate::environment::Environment;
use crate::errors::{undefined_variable, EvalResult};
use crate::unit::Unit;
use crate::value::{Dict, Value};

impl Interpreter {
    pub(crate) fn eval_tag(&mut self, unit: &Arc<Unit>, env: &Environment, tag: &TagNode, span: Span) -> EvalResult {
        match &tag.kind {
            TagKind::Directive(raw) => Ok(Value::from(format!("<{raw}>"))),
            TagKind::Fragment => Ok(Value::from(self.render_parts(unit, env, &tag.children)?)),
            TagKind::Element => self.render_element(unit, env, tag).map(Value::from),
            TagKind::Component => self.call_component(unit, env, tag, span),
        }
    }

    fn render_element(&mut self, unit: &Arc<Unit>, env: &Environment, tag: &TagNode) -> EvalResult<String> {
        let mut out = format!("<{}", tag.name);
        for attr in &tag.attrs {
            let text = match &attr.value {
                TagAttrValue::Flag => None,
                TagAttrValue::Text(parts) => Some(self.render_parts(unit, env, parts)?),
                TagAttrValue::Expr(id) => match self.eval(unit, env, *id)? {
                    Value::Bool(false) | Value::Null => continue,
                    Value::Bool(true) => None,
                    value => Some(self.rendered(&value)?),
                },
            };
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(text) = text {
                out.push_str("=\"");
                out.push_str(&text.replace('"', "&quot;"));
                out.push('"');
            }
        }
        if tag.self_closing {
            out.push_str(" />");
            return Ok(out);
        }
        out.push('>');
        out.push_str(&self.render_parts(unit, env, &tag.children)?);
        out.push_str("</");
        out.push_str(&tag.name);
        out.push('>');
        Ok(out)
    }

    fn call_component(&mut self, unit: &Arc<Unit>, env: &Environment, tag: &TagNode, span: Span) -> EvalResult {
        let mut segments = tag.name.split('.');
        let head = segments.next().unwrap_or_default();
        let mut callee = env.lookup(head).ok_or_else(|| undefined_variable(head))?;
        for segment in segments {
            callee = self.member(&callee, segment)?;
        }

        let props = Dict::new();
        for attr in &tag.attrs {
            let value = match &attr.value {
                TagAttrValue::Flag => Value::Bool(true),
                TagAttrValue::Text(parts) => Value::from(self.render_parts(unit, env, parts)?),
                TagAttrValue::Expr(id) => self.eval(unit, env, *id)?,
            };
            props.set(attr.name.as_str(), value);
        }
        let contents = if tag.self_closing {
            Value::Null
        } else {
            Value::from(self.render_parts(unit, env, &tag.children)?)
        };
        props.set("contents", contents);

        let site = CallSite { unit, span };
        self.call_value(&callee, vec![Value::Dict(props)], &site)
    }
}
