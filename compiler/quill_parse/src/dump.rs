//! S-expression rendering of a parsed program.
//!
//! Used by `quill parse` and by the parser tests. The format is compact and
//! stable: `(+ 1 (* 2 3))`, `[1 2 3]`, `{a: 1, ...rest}`.

use std::fmt::Write;

use quill_ir::{
    AssignTarget, DictEntry, ExprArena, ExprId, ExprKind, PatternId, PatternKind, Program, StmtId,
    StmtKind, TagAttrValue, TagKind, TemplatePart,
};

/// Render every top-level statement, one per line.
pub fn dump_program(program: &Program, arena: &ExprArena) -> String {
    let printer = Printer { arena };
    program
        .stmts
        .iter()
        .map(|&stmt| printer.stmt(stmt))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single expression.
pub fn dump_expr(id: ExprId, arena: &ExprArena) -> String {
    Printer { arena }.expr(id)
}

struct Printer<'a> {
    arena: &'a ExprArena,
}

impl Printer<'_> {
    fn stmt(&self, id: StmtId) -> String {
        match &self.arena.get_stmt(id).kind {
            StmtKind::Let {
                pattern,
                value,
                export,
            } => {
                let head = if *export { "export let" } else { "let" };
                format!("({head} {} {})", self.pattern(*pattern), self.expr(*value))
            }
            StmtKind::Assign {
                target,
                value,
                export,
            } => {
                let target = match target {
                    AssignTarget::Pattern(p) => self.pattern(*p),
                    AssignTarget::Place(e) => self.expr(*e),
                };
                let head = if *export { "export =" } else { "=" };
                format!("({head} {target} {})", self.expr(*value))
            }
            StmtKind::Read {
                pattern,
                source,
                declare,
            } => {
                let head = if *declare { "let <==" } else { "<==" };
                format!("({head} {} {})", self.pattern(*pattern), self.expr(*source))
            }
            StmtKind::Write {
                value,
                target,
                append,
            } => {
                let head = if *append { "==>>" } else { "==>" };
                format!("({head} {} {})", self.expr(*value), self.expr(*target))
            }
            StmtKind::Return(Some(value)) => format!("(return {})", self.expr(*value)),
            StmtKind::Return(None) => "(return)".to_string(),
            StmtKind::Break => "(break)".to_string(),
            StmtKind::Continue => "(continue)".to_string(),
            StmtKind::Expr(expr) => self.expr(*expr),
        }
    }

    fn expr(&self, id: ExprId) -> String {
        match &self.arena.get_expr(id).kind {
            ExprKind::Int(n) => n.to_string(),
            ExprKind::Float(f) => format!("{f:?}"),
            ExprKind::Str(s) => format!("{s:?}"),
            ExprKind::Template(parts) => format!("(tpl{})", self.parts(parts)),
            ExprKind::Bool(b) => b.to_string(),
            ExprKind::Null => "null".to_string(),
            ExprKind::Regex { pattern, flags } => format!("/{pattern}/{flags}"),
            ExprKind::At { kind, text } => format!("@{}({text})", kind.as_str()),
            ExprKind::AtTemplate { kind, parts } => {
                format!("(@{}{})", kind.as_str(), self.parts(parts))
            }
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Array(items) => format!("[{}]", self.list(items)),
            ExprKind::Dict(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|entry| match entry {
                        DictEntry::Field { key, value } => format!("{key}: {}", self.expr(*value)),
                        DictEntry::Computed { key, value } => {
                            format!("[{}]: {}", self.expr(*key), self.expr(*value))
                        }
                        DictEntry::Spread(e) => format!("...{}", self.expr(*e)),
                    })
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            ExprKind::Function { params, body } => {
                let params: Vec<String> = params
                    .iter()
                    .map(|param| match param.default {
                        Some(default) => {
                            format!("(= {} {})", self.pattern(param.pattern), self.expr(default))
                        }
                        None => self.pattern(param.pattern),
                    })
                    .collect();
                format!("(fn [{}] {})", params.join(" "), self.expr(*body))
            }
            ExprKind::Block(stmts) => {
                let mut out = "(block".to_string();
                for &stmt in stmts {
                    let _ = write!(out, " {}", self.stmt(stmt));
                }
                out.push(')');
                out
            }
            ExprKind::Call { func, args } => {
                let mut out = format!("(call {}", self.expr(*func));
                for &arg in args {
                    let _ = write!(out, " {}", self.expr(arg));
                }
                out.push(')');
                out
            }
            ExprKind::Index { target, index } => {
                format!("(index {} {})", self.expr(*target), self.expr(*index))
            }
            ExprKind::Slice { target, start, end } => format!(
                "(slice {} {} {})",
                self.expr(*target),
                self.opt(*start),
                self.opt(*end)
            ),
            ExprKind::Dot { target, name } => format!("(. {} {name})", self.expr(*target)),
            ExprKind::Binary { op, left, right } => format!(
                "({} {} {})",
                op.as_symbol(),
                self.expr(*left),
                self.expr(*right)
            ),
            ExprKind::Unary { op, operand } => {
                format!("({} {})", op.as_symbol(), self.expr(*operand))
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(e) => format!(
                    "(if {} {} {})",
                    self.expr(*cond),
                    self.expr(*then_branch),
                    self.expr(*e)
                ),
                None => format!("(if {} {})", self.expr(*cond), self.expr(*then_branch)),
            },
            ExprKind::For {
                bindings,
                iterable,
                body,
            } => {
                let bind = match bindings.second {
                    Some(second) => {
                        format!("[{} {}]", self.pattern(bindings.first), self.pattern(second))
                    }
                    None => self.pattern(bindings.first),
                };
                format!("(for {bind} {} {})", self.expr(*iterable), self.expr(*body))
            }
            ExprKind::Tag(tag) => {
                let mut out = match &tag.kind {
                    TagKind::Directive(raw) => return format!("(<{raw}>)"),
                    TagKind::Fragment => "(<>".to_string(),
                    TagKind::Component => format!("(<{}/C>", tag.name),
                    TagKind::Element => format!("(<{}>", tag.name),
                };
                for attr in &tag.attrs {
                    let value = match &attr.value {
                        TagAttrValue::Flag => String::new(),
                        TagAttrValue::Text(parts) => format!("=(tpl{})", self.parts(parts)),
                        TagAttrValue::Expr(e) => format!("={}", self.expr(*e)),
                    };
                    let _ = write!(out, " {}{value}", attr.name);
                }
                if tag.self_closing {
                    out.push_str(" /");
                }
                out.push_str(&self.parts(&tag.children));
                out.push(')');
                out
            }
            ExprKind::Import(path) => format!("(import {})", self.expr(*path)),
            ExprKind::Error => "<error>".to_string(),
        }
    }

    fn pattern(&self, id: PatternId) -> String {
        match &self.arena.get_pattern(id).kind {
            PatternKind::Ident(name) => name.clone(),
            PatternKind::Array { elements, rest } => {
                let mut items: Vec<String> = elements.iter().map(|&e| self.pattern(e)).collect();
                if let Some(rest) = rest {
                    items.push(format!("...{rest}"));
                }
                format!("[{}]", items.join(" "))
            }
            PatternKind::Dict { fields, rest } => {
                let mut items: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        let mut out = field.key.clone();
                        if let Some(alias) = &field.alias {
                            let _ = write!(out, " as {alias}");
                        }
                        if let Some(nested) = field.nested {
                            let _ = write!(out, ": {}", self.pattern(nested));
                        }
                        if let Some(default) = field.default {
                            let _ = write!(out, " = {}", self.expr(default));
                        }
                        out
                    })
                    .collect();
                if let Some(rest) = rest {
                    items.push(format!("...{rest}"));
                }
                format!("{{{}}}", items.join(", "))
            }
        }
    }

    fn parts(&self, parts: &[TemplatePart]) -> String {
        let mut out = String::new();
        for part in parts {
            match part {
                TemplatePart::Text(text) => {
                    let _ = write!(out, " {text:?}");
                }
                TemplatePart::Expr(e) => {
                    let _ = write!(out, " {}", self.expr(*e));
                }
            }
        }
        out
    }

    fn list(&self, items: &[ExprId]) -> String {
        items.iter().map(|&e| self.expr(e)).collect::<Vec<_>>().join(" ")
    }

    fn opt(&self, id: Option<ExprId>) -> String {
        id.map_or_else(|| "_".to_string(), |e| self.expr(e))
    }
}
