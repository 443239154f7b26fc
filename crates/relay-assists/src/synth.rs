//! Renders delegation plans into impl blocks and places them after the composite.

use relay_source::AssistConfig;
use relay_types::{DefMap, FnData, GenericParams, ModuleId, Receiver, ReceiverKind, Ty};

use crate::context::FieldSelection;
use crate::edit::{EditPlan, TextEdit};
use crate::planner::{DelegationPlan, PlannedMethod, Strategy};

/// One rendered impl block and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImplementation {
    /// The trait as written in the impl header, e.g. `Deref` or `AsRef<str>`
    pub trait_name: String,
    pub offset: usize,
    /// The impl block, without the leading blank line or the composite's indentation
    pub text: String,
}

pub struct Synthesizer<'a> {
    def_map: &'a DefMap,
    selection: &'a FieldSelection,
    config: &'a AssistConfig,
    module: ModuleId,
}

impl<'a> Synthesizer<'a> {
    pub fn new(def_map: &'a DefMap, selection: &'a FieldSelection, config: &'a AssistConfig) -> Self {
        Synthesizer {
            def_map,
            selection,
            config,
            module: selection.module,
        }
    }

    /// Renders every plan and turns them into insertions right after the composite,
    /// indented like it. All insertions share one offset and keep plan order.
    pub fn synthesize(&self, plans: &[DelegationPlan], base_indent: &str) -> (EditPlan, Vec<GeneratedImplementation>) {
        let offset = self.selection.item_range.end();
        let mut edits = EditPlan::new();
        let mut generated = Vec::with_capacity(plans.len());
        for plan in plans {
            let text = self.render_impl(plan);
            let mut insert = String::from("\n\n");
            insert.push_str(&indent_lines(&text, base_indent));
            edits.push(TextEdit::insert(offset, insert));
            generated.push(GeneratedImplementation {
                trait_name: self.def_map.render_trait_ref(&plan.trait_ref, self.module),
                offset,
                text,
            });
        }
        (edits, generated)
    }

    fn ty(&self, ty: &Ty) -> String {
        self.def_map.render_ty(ty, self.module)
    }

    pub fn render_impl(&self, plan: &DelegationPlan) -> String {
        let indent = &self.config.indent;
        let mut out = String::new();
        if plan.is_unsafe {
            out.push_str("unsafe ");
        }
        out.push_str("impl");
        out.push_str(&self.generic_params(&plan.generics));
        let self_ty = Ty::Adt {
            id: self.selection.adt,
            args: self.def_map.adt(self.selection.adt).generics.identity_args(),
        };
        out.push_str(&format!(
            " {} for {}",
            self.def_map.render_trait_ref(&plan.trait_ref, self.module),
            self.ty(&self_ty)
        ));
        out.push_str(&self.where_clause(&plan.generics, ""));
        out.push_str("{\n");

        let mut sections: Vec<String> = Vec::new();
        if !plan.assoc_types.is_empty() {
            let lines: Vec<String> = plan
                .assoc_types
                .iter()
                .map(|(name, ty)| format!("{indent}type {name} = {};", self.ty(ty)))
                .collect();
            sections.push(lines.join("\n"));
        }
        if !plan.consts.is_empty() {
            let field_trait = self.qualified_trait(plan);
            let lines: Vec<String> = plan
                .consts
                .iter()
                .map(|c| format!("{indent}const {}: {} = {field_trait}::{};", c.name, self.ty(&c.ty), c.name))
                .collect();
            sections.push(lines.join("\n"));
        }
        for method in &plan.methods {
            sections.push(self.render_method(plan, method));
        }
        out.push_str(&sections.join("\n\n"));
        if !sections.is_empty() {
            out.push('\n');
        }
        out.push('}');
        out
    }

    /// `<FieldTy as Trait<Args>>`
    fn qualified_trait(&self, plan: &DelegationPlan) -> String {
        format!(
            "<{} as {}>",
            self.ty(&plan.field_ty),
            self.def_map.render_trait_ref(&plan.trait_ref, self.module)
        )
    }

    fn render_method(&self, plan: &DelegationPlan, method: &PlannedMethod) -> String {
        let indent = &self.config.indent;
        let sig = &method.sig;
        let mut out = String::new();
        if method.strategy == Strategy::ForwardCall && self.config.inline_forwarders {
            out.push_str(&format!("{indent}#[inline]\n"));
        }
        out.push_str(indent);
        if sig.is_async {
            out.push_str("async ");
        }
        if sig.is_unsafe {
            out.push_str("unsafe ");
        }
        out.push_str("fn ");
        out.push_str(&sig.name);
        out.push_str(&self.generic_params(&sig.generics));

        let names = param_names(sig);
        let mut params = Vec::new();
        if let Some(receiver) = &sig.receiver {
            params.push(self.receiver(receiver));
        }
        for ((_, ty), name) in sig.params.iter().zip(&names) {
            params.push(format!("{name}: {}", self.ty(ty)));
        }
        out.push_str(&format!("({})", params.join(", ")));
        if let Some(ret) = &sig.ret {
            out.push_str(&format!(" -> {}", self.ty(ret)));
        }
        out.push_str(&self.where_clause(&sig.generics, indent));
        out.push_str("{\n");

        let body = match method.strategy {
            Strategy::DirectFieldAccess => format!("&{}", self.selection.access()),
            Strategy::DirectFieldAccessMutable => format!("&mut {}", self.selection.access()),
            Strategy::ForwardCall => {
                let receiver = match sig.receiver.as_ref().map(Receiver::kind) {
                    Some(ReceiverKind::ByRef) => format!("&{}", self.selection.access()),
                    Some(ReceiverKind::ByMutRef) => format!("&mut {}", self.selection.access()),
                    Some(ReceiverKind::ByValue) | None => self.selection.access(),
                };
                let args: Vec<String> = std::iter::once(receiver).chain(names.iter().cloned()).collect();
                let mut call = format!("{}::{}({})", self.qualified_trait(plan), sig.name, args.join(", "));
                if sig.is_async {
                    call.push_str(".await");
                }
                if sig.is_unsafe {
                    call = format!("unsafe {{ {call} }}");
                }
                call
            }
        };
        out.push_str(&format!("{indent}{indent}{body}\n{indent}}}"));
        out
    }

    fn receiver(&self, receiver: &Receiver) -> String {
        match receiver {
            Receiver::Value { .. } => "self".to_string(),
            Receiver::Ref { lifetime, mutable } => {
                let mut out = String::from("&");
                if let Some(lt) = lifetime {
                    out.push_str(lt);
                    out.push(' ');
                }
                if *mutable {
                    out.push_str("mut ");
                }
                out.push_str("self");
                out
            }
            Receiver::Typed(ty) => format!("self: {}", self.ty(ty)),
        }
    }

    /// `<'a, T: Clone, U>` or nothing.
    fn generic_params(&self, generics: &GenericParams) -> String {
        if generics.params.is_empty() {
            return String::new();
        }
        let params: Vec<String> = generics
            .params
            .iter()
            .map(|p| self.def_map.render_generic_param(p, self.module))
            .collect();
        format!("<{}>", params.join(", "))
    }

    /// A where clause on its own lines, ending where the opening brace goes. A
    /// single space when there is nothing to write.
    fn where_clause(&self, generics: &GenericParams, indent: &str) -> String {
        if generics.where_predicates.is_empty() {
            return " ".to_string();
        }
        let mut out = format!("\n{indent}where\n");
        for pred in &generics.where_predicates {
            out.push_str(&format!(
                "{indent}{}{},\n",
                self.config.indent,
                self.def_map.render_where_predicate(pred, self.module)
            ));
        }
        out.push_str(indent);
        out
    }
}

/// Parameter names usable as forwarding arguments: written identifiers are kept,
/// patterns and `_` get `arg{n}`.
fn param_names(sig: &FnData) -> Vec<String> {
    sig.params
        .iter()
        .enumerate()
        .map(|(i, (pattern, _))| {
            let simple = pattern.trim_start_matches("mut ").trim();
            let is_ident = !simple.is_empty()
                && simple != "_"
                && simple.chars().all(|c| c.is_alphanumeric() || c == '_')
                && !simple.starts_with(|c: char| c.is_ascii_digit());
            if is_ident {
                simple.to_string()
            } else {
                format!("arg{i}")
            }
        })
        .collect()
}

fn indent_lines(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_string();
    }
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::discovery::discover_interfaces;
    use crate::planner::Planner;
    use crate::testing::{analyze, descriptor};

    fn render_first(fixture_text: &str) -> String {
        let fixture = analyze(fixture_text);
        let (desc, module) = descriptor(&fixture);
        let selection = fixture.selection();
        let sema = fixture.sema();
        let iface = discover_interfaces(sema, &desc, module)
            .candidates
            .into_iter()
            .next()
            .expect("nothing discovered");
        let plan = Planner::new(sema, &selection, &desc).plan(&iface).unwrap();
        Synthesizer::new(sema.def_map(), &selection, fixture.config()).render_impl(&plan)
    }

    #[test]
    fn unsafe_async_and_consts() {
        let text = render_first(
            r#"
unsafe trait Raw {
    const WIDTH: usize;
    unsafe fn peek(&self, at: usize) -> u8;
    async fn load(&mut self);
}
struct Cell;
unsafe impl Raw for Cell {
    const WIDTH: usize = 1;
    unsafe fn peek(&self, at: usize) -> u8 { 0 }
    async fn load(&mut self) {}
}
struct Host { cell: Cell$0 }
"#,
        );
        expect![[r#"
            unsafe impl Raw for Host {
                const WIDTH: usize = <Cell as Raw>::WIDTH;

                unsafe fn peek(&self, at: usize) -> u8 {
                    unsafe { <Cell as Raw>::peek(&self.cell, at) }
                }

                async fn load(&mut self) {
                    <Cell as Raw>::load(&mut self.cell).await
                }
            }"#]]
        .assert_eq(&text);
    }

    #[test]
    fn patterns_get_argument_names() {
        let text = render_first(
            r#"
trait Sink {
    fn put(&mut self, (a, b): (u8, u8), _: bool);
}
struct Bucket;
impl Sink for Bucket {
    fn put(&mut self, (a, b): (u8, u8), _: bool) {}
}
struct Tank { bucket: Bucket$0 }
"#,
        );
        expect![[r#"
            impl Sink for Tank {
                fn put(&mut self, arg0: (u8, u8), arg1: bool) {
                    <Bucket as Sink>::put(&mut self.bucket, arg0, arg1)
                }
            }"#]]
        .assert_eq(&text);
    }

    #[test]
    fn method_where_clauses_are_indented() {
        let text = render_first(
            r#"
trait Visit {
    fn visit<V>(&self, v: V) where V: Clone;
}
struct Node;
impl Visit for Node {
    fn visit<V>(&self, v: V) where V: Clone {}
}
struct Tree { root: Node$0 }
"#,
        );
        expect![[r#"
            impl Visit for Tree {
                fn visit<V>(&self, v: V)
                where
                    V: Clone,
                {
                    <Node as Visit>::visit(&self.root, v)
                }
            }"#]]
        .assert_eq(&text);
    }

    #[test]
    fn blank_lines_are_not_indented() {
        assert_eq!(indent_lines("a\n\n  b", "    "), "    a\n\n      b");
        assert_eq!(indent_lines("a\nb", ""), "a\nb");
    }
}
