//! Name resolution in the type namespace and lowering of `TypeRef`s into `Ty`s.

use relay_stdlib::{is_std_crate, STD_CRATE};
use relay_syntax::ast::{self, GenericArgRef, PathType, TypeRef};

use crate::def_map::{Bound, DefMap, FnData, GenericParamData, GenericParamKind, GenericParams, Receiver, WherePredicate, WhereTarget};
use crate::error::{LowerError, LowerResult};
use crate::ids::{ModuleDef, ModuleId};
use crate::ty::{BuiltinType, GenericArg, Substitution, TraitRef, Ty};

/// Imports may re-export imports; chains longer than this are treated as unresolved.
const MAX_IMPORT_DEPTH: usize = 8;

impl DefMap {
    /// Resolves one name as code in `module` would see it: declared items, `use`
    /// imports, crate names, then the standard prelude.
    pub fn resolve_name(&self, module: ModuleId, name: &str) -> Option<ModuleDef> {
        self.resolve_name_inner(module, name, 0, true)
    }

    /// Resolves a `::`-separated path from `module`.
    pub fn resolve_path<S: AsRef<str>>(&self, module: ModuleId, segments: &[S]) -> Option<ModuleDef> {
        self.resolve_path_inner(module, segments, 0)
    }

    /// The `std::prelude` module, when the standard library is loaded.
    pub fn prelude(&self) -> Option<ModuleId> {
        let std_root = self.crate_root(STD_CRATE)?;
        match self.module(std_root).scope.get("prelude") {
            Some(ModuleDef::Module(prelude)) => Some(*prelude),
            _ => None,
        }
    }

    fn extern_crate(&self, name: &str) -> Option<ModuleId> {
        if is_std_crate(name) {
            return self.crate_root(STD_CRATE);
        }
        if name == relay_source::LOCAL_CRATE {
            return None;
        }
        self.crate_root(name)
    }

    fn resolve_name_inner(&self, module: ModuleId, name: &str, depth: usize, fallbacks: bool) -> Option<ModuleDef> {
        if depth > MAX_IMPORT_DEPTH {
            log::trace!("import chain too deep while resolving `{name}`");
            return None;
        }
        let data = self.module(module);
        if let Some(def) = data.scope.get(name) {
            return Some(*def);
        }
        for import in data.imports.iter().filter(|i| i.binding() == Some(name)) {
            if let Some(def) = self.resolve_path_inner(module, &import.path, depth + 1) {
                return Some(def);
            }
        }
        for import in data.imports.iter().filter(|i| i.glob) {
            if let Some(ModuleDef::Module(target)) = self.resolve_path_inner(module, &import.path, depth + 1) {
                if target == module {
                    continue;
                }
                if let Some(def) = self.resolve_name_inner(target, name, depth + 1, false) {
                    return Some(def);
                }
            }
        }
        if !fallbacks {
            return None;
        }
        if let Some(root) = self.extern_crate(name) {
            return Some(ModuleDef::Module(root));
        }
        let prelude = self.prelude()?;
        if prelude == module {
            return None;
        }
        self.resolve_name_inner(prelude, name, depth + 1, false)
    }

    fn resolve_path_inner<S: AsRef<str>>(&self, module: ModuleId, segments: &[S], depth: usize) -> Option<ModuleDef> {
        let (first, rest) = segments.split_first()?;
        let mut current = match first.as_ref() {
            "crate" => ModuleDef::Module(self.crate_root(&self.module(module).krate)?),
            "self" => ModuleDef::Module(module),
            "super" => ModuleDef::Module(self.module(module).parent?),
            name => self.resolve_name_inner(module, name, depth, true)?,
        };
        for segment in rest {
            let ModuleDef::Module(m) = current else {
                return None;
            };
            current = match segment.as_ref() {
                "self" => current,
                "super" => ModuleDef::Module(self.module(m).parent?),
                name => self.resolve_name_inner(m, name, depth, false)?,
            };
        }
        Some(current)
    }

    /// Human readable module path for diagnostics, e.g. `crate::inner`.
    pub fn describe_module(&self, module: ModuleId) -> String {
        let mut parts = vec![self.module(module).krate.clone()];
        parts.extend(self.module_path(module));
        parts.join("::")
    }
}

/// Lowers syntax into semantic types as seen from one module with some generic
/// parameters in scope.
#[derive(Clone)]
pub struct TypeScope<'a> {
    def_map: &'a DefMap,
    module: ModuleId,
    params: Vec<String>,
    allow_self: bool,
}

impl<'a> TypeScope<'a> {
    pub fn new(def_map: &'a DefMap, module: ModuleId) -> Self {
        TypeScope {
            def_map,
            module,
            params: Vec::new(),
            allow_self: false,
        }
    }

    /// Adds generic parameter names to the scope.
    pub fn with_params<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.params.extend(names.into_iter().map(|n| n.as_ref().to_string()));
        self
    }

    /// Lets `Self` resolve to `Ty::SelfTy`, as inside traits and impls.
    pub fn with_self(mut self) -> Self {
        self.allow_self = true;
        self
    }

    pub fn module(&self) -> ModuleId {
        self.module
    }

    fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }

    fn unresolved(&self, path: impl ToString) -> LowerError {
        LowerError::UnresolvedPath {
            path: path.to_string(),
            module: self.def_map.describe_module(self.module),
            span: None,
        }
    }

    /// Strict lowering: fails on any path that does not resolve and on placeholders.
    pub fn lower_type(&self, ty: &TypeRef) -> LowerResult<Ty> {
        let lowered = match ty {
            TypeRef::Path(path) => self.lower_path_type(path)?,
            TypeRef::Ref {
                lifetime,
                mutable,
                inner,
            } => Ty::Ref {
                lifetime: lifetime.clone(),
                mutable: *mutable,
                inner: Box::new(self.lower_type(inner)?),
            },
            TypeRef::Ptr { mutable, inner } => Ty::Ptr {
                mutable: *mutable,
                inner: Box::new(self.lower_type(inner)?),
            },
            TypeRef::Tuple(elems) => Ty::Tuple(elems.iter().map(|e| self.lower_type(e)).collect::<LowerResult<_>>()?),
            TypeRef::Slice(inner) => Ty::Slice(Box::new(self.lower_type(inner)?)),
            TypeRef::Array(inner, len) => Ty::Array(Box::new(self.lower_type(inner)?), len.clone()),
            TypeRef::Never => Ty::Never,
            TypeRef::Opaque(text) => Ty::Opaque(text.clone()),
            TypeRef::Infer => return Err(LowerError::NotAType { text: "_".to_string() }),
            TypeRef::Error(text) => return Err(LowerError::NotAType { text: text.clone() }),
        };
        if lowered.contains_unknown() {
            return Err(LowerError::NotAType { text: ty.to_string() });
        }
        Ok(lowered)
    }

    /// Lenient lowering for signatures: unresolved types are recorded and kept as text.
    pub fn lower_type_lenient(&self, ty: &TypeRef, diagnostics: &mut Vec<LowerError>) -> Ty {
        self.lower_type(ty).unwrap_or_else(|err| {
            diagnostics.push(err);
            Ty::Opaque(ty.to_string())
        })
    }

    fn lower_path_type(&self, path: &PathType) -> LowerResult<Ty> {
        let names = path.names();
        match names.as_slice() {
            [single] => {
                if self.has_param(single) {
                    return Ok(Ty::Param(single.to_string()));
                }
                if *single == "Self" && self.allow_self {
                    return Ok(Ty::SelfTy);
                }
                if let Some(builtin) = BuiltinType::from_name(single) {
                    return Ok(Ty::Builtin(builtin));
                }
            }
            [base, assoc] if self.has_param(base) || (*base == "Self" && self.allow_self) => {
                let self_ty = if *base == "Self" {
                    Ty::SelfTy
                } else {
                    Ty::Param(base.to_string())
                };
                return Ok(Ty::Projection {
                    self_ty: Box::new(self_ty),
                    trait_ref: None,
                    name: assoc.to_string(),
                });
            }
            _ => {}
        }
        match self.def_map.resolve_path(self.module, &names) {
            Some(ModuleDef::Adt(id)) => {
                let written = path.last().map(|s| s.args.as_slice()).unwrap_or_default();
                let (args, _) = self.lower_args(&self.def_map.adt(id).generics, written, None)?;
                Ok(Ty::Adt { id, args })
            }
            Some(other) => Err(LowerError::WrongKind {
                path: path.to_string(),
                found: describe_def(other).to_string(),
                expected: "type".to_string(),
            }),
            None => Err(self.unresolved(path)),
        }
    }

    /// Aligns written generic arguments with `params`, filling defaults. Defaults that
    /// mention `Self` get `self_ty` when it is known.
    fn lower_args(
        &self,
        params: &GenericParams,
        written: &[GenericArgRef],
        self_ty: Option<&Ty>,
    ) -> LowerResult<(Vec<GenericArg>, Vec<(String, Ty)>)> {
        let mut lifetimes = written.iter().filter_map(|arg| match arg {
            GenericArgRef::Lifetime(lt) => Some(lt),
            _ => None,
        });
        let mut others = written
            .iter()
            .filter(|arg| matches!(arg, GenericArgRef::Type(_) | GenericArgRef::Const(_)));
        let mut bindings = Vec::new();
        for arg in written {
            if let GenericArgRef::Binding { name, ty } = arg {
                bindings.push((name.clone(), self.lower_type(ty)?));
            }
        }

        let mut args = Vec::with_capacity(params.params.len());
        let mut so_far = Substitution::new();
        for param in &params.params {
            let arg = match &param.kind {
                GenericParamKind::Lifetime => GenericArg::Lifetime(lifetimes.next().cloned().unwrap_or_else(|| "'_".to_string())),
                GenericParamKind::Type { default } => match others.next() {
                    Some(GenericArgRef::Type(ty)) => GenericArg::Type(self.lower_type(ty)?),
                    Some(other) => GenericArg::Type(Ty::Opaque(other.to_string())),
                    None => {
                        let ty = match default {
                            Some(default) => {
                                let ty = default.subst(&so_far);
                                match self_ty {
                                    Some(self_ty) => ty.replace_self(self_ty),
                                    None => ty,
                                }
                            }
                            None => Ty::Unknown,
                        };
                        GenericArg::Type(ty)
                    }
                },
                GenericParamKind::Const { .. } => match others.next() {
                    Some(GenericArgRef::Type(TypeRef::Path(p))) => GenericArg::Const(p.to_string()),
                    Some(other) => GenericArg::Const(other.to_string()),
                    None => GenericArg::Const("_".to_string()),
                },
            };
            so_far.insert(param.name.clone(), arg.clone());
            args.push(arg);
        }
        Ok((args, bindings))
    }

    /// Lowers a trait path such as `PartialEq<Rhs>` or `Iterator<Item = u8>`.
    pub fn lower_trait_ref(&self, path: &PathType, self_ty: Option<&Ty>) -> LowerResult<(TraitRef, Vec<(String, Ty)>)> {
        match self.def_map.resolve_path(self.module, &path.names()) {
            Some(ModuleDef::Trait(trait_id)) => {
                let written = path.last().map(|s| s.args.as_slice()).unwrap_or_default();
                let (args, bindings) = self.lower_args(&self.def_map.trait_(trait_id).generics, written, self_ty)?;
                Ok((TraitRef { trait_id, args }, bindings))
            }
            Some(other) => Err(LowerError::WrongKind {
                path: path.to_string(),
                found: describe_def(other).to_string(),
                expected: "trait".to_string(),
            }),
            None => Err(self.unresolved(path)),
        }
    }

    pub fn lower_bounds(&self, bounds: &[ast::Bound], target: Option<&Ty>, diagnostics: &mut Vec<LowerError>) -> Vec<Bound> {
        bounds
            .iter()
            .map(|bound| match bound {
                ast::Bound::Trait(path) => match self.lower_trait_ref(path, target) {
                    Ok((trait_ref, bindings)) => Bound::Trait { trait_ref, bindings },
                    Err(err) => {
                        diagnostics.push(err);
                        Bound::Verbatim(path.to_string())
                    }
                },
                ast::Bound::Maybe(path) => match self.lower_trait_ref(path, target) {
                    Ok((trait_ref, _)) => Bound::Maybe(trait_ref),
                    Err(err) => {
                        diagnostics.push(err);
                        Bound::Verbatim(format!("?{path}"))
                    }
                },
                ast::Bound::Lifetime(lt) => Bound::Lifetime(lt.clone()),
                ast::Bound::Verbatim(text) => Bound::Verbatim(text.clone()),
            })
            .collect()
    }

    /// Lowers a generics list. The parameter names must already be in scope.
    pub fn lower_generics(&self, generics: &ast::Generics, diagnostics: &mut Vec<LowerError>) -> GenericParams {
        let params = generics
            .params
            .iter()
            .map(|param| {
                let (kind, target) = match &param.kind {
                    ast::GenericParamKind::Lifetime => (GenericParamKind::Lifetime, None),
                    ast::GenericParamKind::Type { default } => (
                        GenericParamKind::Type {
                            default: default.as_ref().map(|d| self.lower_type_lenient(d, diagnostics)),
                        },
                        Some(Ty::Param(param.name.clone())),
                    ),
                    ast::GenericParamKind::Const { ty } => (
                        GenericParamKind::Const {
                            ty: self.lower_type_lenient(ty, diagnostics),
                        },
                        None,
                    ),
                };
                GenericParamData {
                    name: param.name.clone(),
                    kind,
                    bounds: self.lower_bounds(&param.bounds, target.as_ref(), diagnostics),
                }
            })
            .collect();
        let where_predicates = generics
            .where_predicates
            .iter()
            .map(|pred| {
                let target = match &pred.target {
                    ast::WhereTarget::Type(ty) => WhereTarget::Type(self.lower_type_lenient(ty, diagnostics)),
                    ast::WhereTarget::Lifetime(lt) => WhereTarget::Lifetime(lt.clone()),
                };
                let target_ty = match &target {
                    WhereTarget::Type(ty) => Some(ty.clone()),
                    WhereTarget::Lifetime(_) => None,
                };
                WherePredicate {
                    bounds: self.lower_bounds(&pred.bounds, target_ty.as_ref(), diagnostics),
                    target,
                }
            })
            .collect();
        GenericParams {
            params,
            where_predicates,
        }
    }

    /// Lowers a method signature; the method's own generic parameters are added to the scope.
    pub fn lower_fn(&self, sig: &ast::FnSig, diagnostics: &mut Vec<LowerError>) -> FnData {
        let scope = self
            .clone()
            .with_params(sig.generics.params.iter().map(|p| p.name.as_str()));
        let receiver = sig.self_param.as_ref().map(|param| match param {
            ast::SelfParam::Value { mutable } => Receiver::Value { mutable: *mutable },
            ast::SelfParam::Ref { lifetime, mutable } => Receiver::Ref {
                lifetime: lifetime.clone(),
                mutable: *mutable,
            },
            ast::SelfParam::Typed(ty) => Receiver::Typed(scope.lower_type_lenient(ty, diagnostics)),
        });
        FnData {
            name: sig.name.text.clone(),
            generics: scope.lower_generics(&sig.generics, diagnostics),
            receiver,
            params: sig
                .params
                .iter()
                .map(|p| (p.pattern.clone(), scope.lower_type_lenient(&p.ty, diagnostics)))
                .collect(),
            ret: sig.ret.as_ref().map(|ty| scope.lower_type_lenient(ty, diagnostics)),
            has_body: sig.has_body,
            is_unsafe: sig.is_unsafe,
            is_async: sig.is_async,
        }
    }
}

fn describe_def(def: ModuleDef) -> &'static str {
    match def {
        ModuleDef::Module(_) => "module",
        ModuleDef::Adt(_) => "type",
        ModuleDef::Trait(_) => "trait",
    }
}
