//! Rendering semantic types back into source text as seen from a module.
//!
//! A definition is written bare when the module can already name it (declared there,
//! imported, or in the prelude), under its import alias when it has one, and fully
//! qualified otherwise.

use crate::def_map::{Bound, DefMap, GenericParamData, GenericParamKind, WherePredicate, WhereTarget};
use crate::ids::{ModuleDef, ModuleId};
use crate::ty::{GenericArg, TraitRef, Ty};

impl DefMap {
    pub fn def_name(&self, def: ModuleDef) -> &str {
        match def {
            ModuleDef::Module(m) => &self.module(m).name,
            ModuleDef::Adt(id) => &self.adt(id).name,
            ModuleDef::Trait(id) => &self.trait_(id).name,
        }
    }

    fn def_owner(&self, def: ModuleDef) -> Option<ModuleId> {
        match def {
            ModuleDef::Module(m) => self.module(m).parent,
            ModuleDef::Adt(id) => Some(self.adt(id).module),
            ModuleDef::Trait(id) => Some(self.trait_(id).module),
        }
    }

    /// Absolute path of `def`, starting with its crate name (`std::fmt::Debug`,
    /// `crate::inner::Wrapper`).
    pub fn def_path(&self, def: ModuleDef) -> String {
        let Some(owner) = self.def_owner(def) else {
            return match def {
                ModuleDef::Module(m) => self.module(m).krate.clone(),
                _ => self.def_name(def).to_string(),
            };
        };
        let mut segments = vec![self.module(owner).krate.clone()];
        segments.extend(self.module_path(owner));
        segments.push(self.def_name(def).to_string());
        segments.join("::")
    }

    /// The shortest way to name `def` from `from`.
    pub fn path_to(&self, def: ModuleDef, from: ModuleId) -> String {
        let name = self.def_name(def);
        if self.resolve_name(from, name) == Some(def) {
            return name.to_string();
        }
        let alias = self
            .module(from)
            .imports
            .iter()
            .filter_map(|import| import.binding())
            .find(|binding| self.resolve_name(from, binding) == Some(def));
        if let Some(alias) = alias {
            return alias.to_string();
        }
        let Some(owner) = self.def_owner(def) else {
            return self.module(from).krate.clone();
        };
        let krate = &self.module(owner).krate;
        let prefix = if *krate == self.module(from).krate {
            "crate".to_string()
        } else {
            krate.clone()
        };
        let mut segments = vec![prefix];
        segments.extend(self.module_path(owner));
        segments.push(name.to_string());
        segments.join("::")
    }

    pub fn render_ty(&self, ty: &Ty, from: ModuleId) -> String {
        match ty {
            Ty::Adt { id, args } => {
                let mut out = self.path_to(ModuleDef::Adt(*id), from);
                out.push_str(&self.render_args(args, &[], from));
                out
            }
            Ty::Builtin(builtin) => builtin.name().to_string(),
            Ty::Param(name) => name.clone(),
            Ty::Ref {
                lifetime,
                mutable,
                inner,
            } => {
                let mut out = String::from("&");
                if let Some(lt) = lifetime {
                    out.push_str(lt);
                    out.push(' ');
                }
                if *mutable {
                    out.push_str("mut ");
                }
                out.push_str(&self.render_ty(inner, from));
                out
            }
            Ty::Ptr { mutable, inner } => {
                format!("*{} {}", if *mutable { "mut" } else { "const" }, self.render_ty(inner, from))
            }
            Ty::Tuple(elems) if elems.len() == 1 => format!("({},)", self.render_ty(&elems[0], from)),
            Ty::Tuple(elems) => {
                let parts: Vec<String> = elems.iter().map(|e| self.render_ty(e, from)).collect();
                format!("({})", parts.join(", "))
            }
            Ty::Slice(inner) => format!("[{}]", self.render_ty(inner, from)),
            Ty::Array(inner, len) => format!("[{}; {}]", self.render_ty(inner, from), len),
            Ty::Never => "!".to_string(),
            Ty::SelfTy => "Self".to_string(),
            Ty::Projection {
                self_ty,
                trait_ref: Some(trait_ref),
                name,
            } => format!(
                "<{} as {}>::{}",
                self.render_ty(self_ty, from),
                self.render_trait_ref(trait_ref, from),
                name
            ),
            Ty::Projection { self_ty, name, .. } => format!("{}::{}", self.render_ty(self_ty, from), name),
            Ty::Opaque(text) => text.clone(),
            Ty::Unknown => "_".to_string(),
        }
    }

    pub fn render_trait_ref(&self, trait_ref: &TraitRef, from: ModuleId) -> String {
        let mut out = self.path_to(ModuleDef::Trait(trait_ref.trait_id), from);
        out.push_str(&self.render_args(&trait_ref.args, &[], from));
        out
    }

    fn render_args(&self, args: &[GenericArg], bindings: &[(String, Ty)], from: ModuleId) -> String {
        if args.is_empty() && bindings.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                GenericArg::Type(ty) => self.render_ty(ty, from),
                GenericArg::Lifetime(text) | GenericArg::Const(text) => text.clone(),
            })
            .chain(
                bindings
                    .iter()
                    .map(|(name, ty)| format!("{} = {}", name, self.render_ty(ty, from))),
            )
            .collect();
        format!("<{}>", parts.join(", "))
    }

    pub fn render_bound(&self, bound: &Bound, from: ModuleId) -> String {
        match bound {
            Bound::Trait { trait_ref, bindings } => {
                let mut out = self.path_to(ModuleDef::Trait(trait_ref.trait_id), from);
                out.push_str(&self.render_args(&trait_ref.args, bindings, from));
                out
            }
            Bound::Maybe(trait_ref) => format!("?{}", self.render_trait_ref(trait_ref, from)),
            Bound::Lifetime(text) | Bound::Verbatim(text) => text.clone(),
        }
    }

    pub fn render_bounds(&self, bounds: &[Bound], from: ModuleId) -> String {
        bounds
            .iter()
            .map(|b| self.render_bound(b, from))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// `T: Clone + 'a`, `'a: 'b`, `const N: usize`
    pub fn render_generic_param(&self, param: &GenericParamData, from: ModuleId) -> String {
        match &param.kind {
            GenericParamKind::Const { ty } => format!("const {}: {}", param.name, self.render_ty(ty, from)),
            _ if param.bounds.is_empty() => param.name.clone(),
            _ => format!("{}: {}", param.name, self.render_bounds(&param.bounds, from)),
        }
    }

    pub fn render_where_predicate(&self, pred: &WherePredicate, from: ModuleId) -> String {
        let target = match &pred.target {
            WhereTarget::Type(ty) => self.render_ty(ty, from),
            WhereTarget::Lifetime(lt) => lt.clone(),
        };
        format!("{}: {}", target, self.render_bounds(&pred.bounds, from))
    }
}
