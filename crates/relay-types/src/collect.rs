//! Builds the `DefMap` of a workspace.
//!
//! Collection runs in two passes. The first walks the parsed items of every crate and
//! registers modules, names and `use` imports, giving each ADT and trait a placeholder
//! generics list that only knows parameter names and kinds. The second pass lowers
//! everything that mentions types: generics with bounds and defaults first, then
//! fields, trait items and impls, each through a `TypeScope` rooted in the module that
//! declared it.

use indexmap::IndexMap;
use relay_source::{SourceFile, Workspace};
use relay_syntax::ast::{self, ItemKind};
use relay_syntax::{parse_file_query, SyntaxDatabase};

use crate::def_map::*;
use crate::error::LowerError;
use crate::ids::{AdtId, ModuleDef, ModuleId, TraitId};
use crate::resolve::TypeScope;
use crate::ty::{TraitRef, Ty};

struct PendingAdt {
    id: AdtId,
    generics: ast::Generics,
    fields: Vec<ast::FieldDef>,
}

struct PendingTrait {
    id: TraitId,
    def: ast::TraitDef,
}

struct PendingImpl {
    module: ModuleId,
    def: ast::ImplDef,
}

#[derive(Default)]
struct Collector {
    map: DefMap,
    adts: Vec<PendingAdt>,
    traits: Vec<PendingTrait>,
    impls: Vec<PendingImpl>,
}

pub(crate) fn collect_def_map(db: &dyn SyntaxDatabase, workspace: Workspace) -> DefMap {
    let mut collector = Collector::default();
    for krate in workspace.crates(db) {
        let root = collector.new_module(&krate.name, String::new(), None);
        collector.map.crate_roots.insert(krate.name.clone(), root);
        for &file in &krate.files {
            let parsed = parse_file_query(db, file);
            collector.collect_items(root, &parsed.items, file);
        }
    }
    collector.lower();
    let map = collector.map;
    for diagnostic in &map.diagnostics {
        log::warn!("{diagnostic}");
    }
    log::debug!(
        "def map: {} modules, {} adts, {} traits, {} impls",
        map.modules.len(),
        map.adts.len(),
        map.traits.len(),
        map.impls.len()
    );
    map
}

fn shape_only(generics: &ast::Generics) -> GenericParams {
    GenericParams {
        params: generics
            .params
            .iter()
            .map(|p| GenericParamData {
                name: p.name.clone(),
                kind: match p.kind {
                    ast::GenericParamKind::Lifetime => GenericParamKind::Lifetime,
                    ast::GenericParamKind::Type { .. } => GenericParamKind::Type { default: None },
                    ast::GenericParamKind::Const { .. } => GenericParamKind::Const { ty: Ty::Unknown },
                },
                bounds: Vec::new(),
            })
            .collect(),
        where_predicates: Vec::new(),
    }
}

impl Collector {
    fn new_module(&mut self, krate: &str, name: String, parent: Option<ModuleId>) -> ModuleId {
        let id = ModuleId::from_index(self.map.modules.len());
        self.map.modules.push(ModuleData {
            krate: krate.to_string(),
            name,
            parent,
            scope: IndexMap::new(),
            imports: Vec::new(),
        });
        id
    }

    fn declare(&mut self, module: ModuleId, name: &str, def: ModuleDef) -> bool {
        let scope = &mut self.map.modules[module.index()].scope;
        if scope.contains_key(name) {
            let module = self.map.describe_module(module);
            self.map.diagnostics.push(LowerError::DuplicateDefinition {
                name: name.to_string(),
                module,
            });
            return false;
        }
        scope.insert(name.to_string(), def);
        true
    }

    fn collect_items(&mut self, module: ModuleId, items: &[ast::Item], file: SourceFile) {
        for item in items {
            match &item.kind {
                ItemKind::Struct(def) => {
                    let id = AdtId::from_index(self.map.adts.len());
                    if !self.declare(module, &def.name.text, ModuleDef::Adt(id)) {
                        continue;
                    }
                    self.map.adts.push(AdtData {
                        name: def.name.text.clone(),
                        module,
                        visibility: item.visibility.clone(),
                        kind: AdtKind::Struct(def.shape),
                        generics: shape_only(&def.generics),
                        fields: Vec::new(),
                        file,
                        range: item.range,
                    });
                    self.adts.push(PendingAdt {
                        id,
                        generics: def.generics.clone(),
                        fields: def.fields.clone(),
                    });
                }
                ItemKind::Enum(def) => {
                    let id = AdtId::from_index(self.map.adts.len());
                    if !self.declare(module, &def.name.text, ModuleDef::Adt(id)) {
                        continue;
                    }
                    self.map.adts.push(AdtData {
                        name: def.name.text.clone(),
                        module,
                        visibility: item.visibility.clone(),
                        kind: AdtKind::Enum,
                        generics: shape_only(&def.generics),
                        fields: Vec::new(),
                        file,
                        range: item.range,
                    });
                    self.adts.push(PendingAdt {
                        id,
                        generics: def.generics.clone(),
                        fields: Vec::new(),
                    });
                }
                ItemKind::Trait(def) => {
                    let id = TraitId::from_index(self.map.traits.len());
                    if !self.declare(module, &def.name.text, ModuleDef::Trait(id)) {
                        continue;
                    }
                    self.map.traits.push(TraitData {
                        name: def.name.text.clone(),
                        module,
                        visibility: item.visibility.clone(),
                        generics: shape_only(&def.generics),
                        supertraits: Vec::new(),
                        items: Vec::new(),
                        is_unsafe: def.is_unsafe,
                    });
                    self.traits.push(PendingTrait { id, def: def.clone() });
                }
                ItemKind::Impl(def) => self.impls.push(PendingImpl {
                    module,
                    def: def.clone(),
                }),
                ItemKind::Module(def) => {
                    let existing = match self.map.module(module).scope.get(def.name.text.as_str()) {
                        Some(ModuleDef::Module(child)) => Some(*child),
                        _ => None,
                    };
                    let child = match existing {
                        Some(child) => child,
                        None => {
                            let krate = self.map.module(module).krate.clone();
                            let child = self.new_module(&krate, def.name.text.clone(), Some(module));
                            if !self.declare(module, &def.name.text, ModuleDef::Module(child)) {
                                continue;
                            }
                            child
                        }
                    };
                    self.collect_items(child, &def.items, file);
                }
                ItemKind::Use(imports) => {
                    self.map.modules[module.index()].imports.extend(imports.iter().cloned());
                }
            }
        }
    }

    fn lower(&mut self) {
        let mut diagnostics = Vec::new();

        // Generics first: every later signature may refer to their defaults.
        let adt_generics: Vec<GenericParams> = self
            .adts
            .iter()
            .map(|pending| {
                let data = self.map.adt(pending.id);
                TypeScope::new(&self.map, data.module)
                    .with_params(data.generics.names())
                    .lower_generics(&pending.generics, &mut diagnostics)
            })
            .collect();
        for (pending, generics) in self.adts.iter().zip(adt_generics) {
            self.map.adts[pending.id.index()].generics = generics;
        }
        let trait_generics: Vec<GenericParams> = self
            .traits
            .iter()
            .map(|pending| {
                let data = self.map.trait_(pending.id);
                TypeScope::new(&self.map, data.module)
                    .with_params(data.generics.names())
                    .with_self()
                    .lower_generics(&pending.def.generics, &mut diagnostics)
            })
            .collect();
        for (pending, generics) in self.traits.iter().zip(trait_generics) {
            self.map.traits[pending.id.index()].generics = generics;
        }

        let fields: Vec<Vec<FieldData>> = self
            .adts
            .iter()
            .map(|pending| {
                let data = self.map.adt(pending.id);
                let scope = TypeScope::new(&self.map, data.module).with_params(data.generics.names());
                pending
                    .fields
                    .iter()
                    .map(|field| FieldData {
                        name: field.name.clone(),
                        type_ref: field.ty.clone(),
                        ty: scope.lower_type_lenient(&field.ty, &mut diagnostics),
                        visibility: field.visibility.clone(),
                    })
                    .collect()
            })
            .collect();
        for (pending, fields) in self.adts.iter().zip(fields) {
            self.map.adts[pending.id.index()].fields = fields;
        }

        let trait_bodies: Vec<(Vec<TraitRef>, Vec<TraitItem>)> = self
            .traits
            .iter()
            .map(|pending| lower_trait_body(&self.map, pending, &mut diagnostics))
            .collect();
        for (pending, (supertraits, items)) in self.traits.iter().zip(trait_bodies) {
            let data = &mut self.map.traits[pending.id.index()];
            data.supertraits = supertraits;
            data.items = items;
        }

        let impls: Vec<ImplData> = self
            .impls
            .iter()
            .filter_map(|pending| lower_impl(&self.map, pending, &mut diagnostics))
            .collect();
        self.map.impls = impls;
        self.map.diagnostics.extend(diagnostics);
    }
}

fn lower_trait_body(map: &DefMap, pending: &PendingTrait, diagnostics: &mut Vec<LowerError>) -> (Vec<TraitRef>, Vec<TraitItem>) {
    let data = map.trait_(pending.id);
    let scope = TypeScope::new(map, data.module)
        .with_params(data.generics.names())
        .with_self();
    let supertraits = scope
        .lower_bounds(&pending.def.supertraits, None, diagnostics)
        .into_iter()
        .filter_map(|bound| match bound {
            Bound::Trait { trait_ref, .. } => Some(trait_ref),
            _ => None,
        })
        .collect();
    let items = pending
        .def
        .items
        .iter()
        .map(|item| match item {
            ast::AssocItem::Fn(sig) => TraitItem::Fn(scope.lower_fn(sig, diagnostics)),
            ast::AssocItem::Type(ty) => {
                let projection = Ty::Projection {
                    self_ty: Box::new(Ty::SelfTy),
                    trait_ref: None,
                    name: ty.name.text.clone(),
                };
                TraitItem::Type(AssocTypeData {
                    name: ty.name.text.clone(),
                    bounds: scope.lower_bounds(&ty.bounds, Some(&projection), diagnostics),
                    default: ty.ty.as_ref().map(|t| scope.lower_type_lenient(t, diagnostics)),
                })
            }
            ast::AssocItem::Const(c) => TraitItem::Const(AssocConstData {
                name: c.name.text.clone(),
                ty: c
                    .ty
                    .as_ref()
                    .map(|t| scope.lower_type_lenient(t, diagnostics))
                    .unwrap_or(Ty::Unknown),
                has_default: c.has_value,
            }),
        })
        .collect();
    (supertraits, items)
}

fn lower_impl(map: &DefMap, pending: &PendingImpl, diagnostics: &mut Vec<LowerError>) -> Option<ImplData> {
    // Inherent impls never take part in trait discovery.
    let trait_path = pending.def.trait_ref.as_ref()?;
    let names: Vec<&str> = pending.def.generics.params.iter().map(|p| p.name.as_str()).collect();
    let scope = TypeScope::new(map, pending.module).with_params(names);
    let self_ty = scope.lower_type_lenient(&pending.def.self_ty, diagnostics);
    let generics = scope.lower_generics(&pending.def.generics, diagnostics);
    let trait_ref = match scope.lower_trait_ref(trait_path, Some(&self_ty)) {
        Ok((trait_ref, _)) => trait_ref,
        Err(err) => {
            log::debug!("dropping impl: {err}");
            diagnostics.push(LowerError::UnresolvedImplTrait {
                path: trait_path.to_string(),
                module: map.describe_module(pending.module),
            });
            return None;
        }
    };
    let item_scope = scope.with_self();
    let mut assoc_types = Vec::new();
    let mut assoc_consts = Vec::new();
    let mut methods = Vec::new();
    for item in &pending.def.items {
        match item {
            ast::AssocItem::Type(ty) => {
                let lowered = match &ty.ty {
                    Some(t) => item_scope.lower_type_lenient(t, diagnostics),
                    None => Ty::Unknown,
                };
                assoc_types.push((ty.name.text.clone(), lowered));
            }
            ast::AssocItem::Const(c) => assoc_consts.push(c.name.text.clone()),
            ast::AssocItem::Fn(sig) => methods.push(sig.name.text.clone()),
        }
    }
    Some(ImplData {
        module: pending.module,
        generics,
        trait_ref: Some(trait_ref),
        negative: pending.def.negative,
        self_ty,
        assoc_types,
        assoc_consts,
        methods,
    })
}
