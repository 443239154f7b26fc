//! One-sided unification: impl headers are patterns over their generic parameters,
//! the queried type is rigid.
//!
//! Lifetimes never cause a mismatch. They are bound when the pattern names an impl
//! lifetime so that substituted signatures stay well formed.

use crate::ty::{GenericArg, Substitution, Ty};

/// Matches `pattern`, whose parameters listed in `vars` may bind, against `target`.
/// On success `subst` holds the bindings; on failure it may hold partial bindings.
pub fn unify(pattern: &Ty, target: &Ty, vars: &[&str], subst: &mut Substitution) -> bool {
    let ok = match (pattern, target) {
        (Ty::Param(name), _) if vars.contains(&name.as_str()) => match subst.get(name) {
            Some(GenericArg::Type(bound)) => bound == target,
            Some(_) => false,
            None => {
                subst.insert(name.clone(), GenericArg::Type(target.clone()));
                true
            }
        },
        (Ty::Adt { id: a, args: a_args }, Ty::Adt { id: b, args: b_args }) => {
            a == b && a_args.len() == b_args.len() && unify_args(a_args, b_args, vars, subst)
        }
        (
            Ty::Ref {
                lifetime: a_lt,
                mutable: a_mut,
                inner: a_inner,
            },
            Ty::Ref {
                lifetime: b_lt,
                mutable: b_mut,
                inner: b_inner,
            },
        ) => {
            if let Some(lt) = a_lt {
                bind_lifetime(lt, b_lt.as_deref().unwrap_or("'_"), vars, subst);
            }
            a_mut == b_mut && unify(a_inner, b_inner, vars, subst)
        }
        (
            Ty::Ptr {
                mutable: a_mut,
                inner: a_inner,
            },
            Ty::Ptr {
                mutable: b_mut,
                inner: b_inner,
            },
        ) => a_mut == b_mut && unify(a_inner, b_inner, vars, subst),
        (Ty::Tuple(a), Ty::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| unify(a, b, vars, subst))
        }
        (Ty::Slice(a), Ty::Slice(b)) => unify(a, b, vars, subst),
        (Ty::Array(a, a_len), Ty::Array(b, b_len)) => {
            unify(a, b, vars, subst) && unify_const(a_len, b_len, vars, subst)
        }
        (
            Ty::Projection {
                self_ty: a_self,
                name: a_name,
                ..
            },
            Ty::Projection {
                self_ty: b_self,
                name: b_name,
                ..
            },
        ) => a_name == b_name && unify(a_self, b_self, vars, subst),
        (Ty::Unknown, _) | (_, Ty::Unknown) => false,
        (a, b) => a == b,
    };
    if !ok {
        log::trace!("no match: {pattern} against {target}");
    }
    ok
}

pub fn unify_args(patterns: &[GenericArg], targets: &[GenericArg], vars: &[&str], subst: &mut Substitution) -> bool {
    patterns.iter().zip(targets).all(|(p, t)| match (p, t) {
        (GenericArg::Type(p), GenericArg::Type(t)) => unify(p, t, vars, subst),
        (GenericArg::Lifetime(p), GenericArg::Lifetime(t)) => {
            bind_lifetime(p, t, vars, subst);
            true
        }
        (GenericArg::Const(p), GenericArg::Const(t)) => unify_const(p, t, vars, subst),
        _ => false,
    })
}

fn bind_lifetime(pattern: &str, target: &str, vars: &[&str], subst: &mut Substitution) {
    if vars.contains(&pattern) && !subst.contains(pattern) {
        subst.insert(pattern, GenericArg::Lifetime(target.to_string()));
    }
}

fn unify_const(pattern: &str, target: &str, vars: &[&str], subst: &mut Substitution) -> bool {
    if vars.contains(&pattern) {
        return match subst.get(pattern) {
            Some(GenericArg::Const(bound)) => bound == target,
            Some(_) => false,
            None => {
                subst.insert(pattern, GenericArg::Const(target.to_string()));
                true
            }
        };
    }
    pattern == target || pattern == "_" || target == "_"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AdtId;
    use crate::ty::BuiltinType;

    fn adt(id: u32, args: Vec<Ty>) -> Ty {
        Ty::Adt {
            id: AdtId(id),
            args: args.into_iter().map(GenericArg::Type).collect(),
        }
    }

    fn param(name: &str) -> Ty {
        Ty::Param(name.to_string())
    }

    #[test]
    fn impl_params_bind_to_target_components() {
        let mut subst = Substitution::new();
        let pattern = adt(0, vec![param("T")]);
        let target = adt(0, vec![Ty::Builtin(BuiltinType::U8)]);
        assert!(unify(&pattern, &target, &["T"], &mut subst));
        assert_eq!(
            subst.get("T"),
            Some(&GenericArg::Type(Ty::Builtin(BuiltinType::U8)))
        );
    }

    #[test]
    fn target_params_are_rigid() {
        let mut subst = Substitution::new();
        // impl Foo for Vec<u8> does not cover Vec<T>
        let pattern = adt(0, vec![Ty::Builtin(BuiltinType::U8)]);
        let target = adt(0, vec![param("T")]);
        assert!(!unify(&pattern, &target, &[], &mut subst));

        // but impl<T> Foo for Vec<T> does, even with the same parameter name
        let mut subst = Substitution::new();
        assert!(unify(&adt(0, vec![param("T")]), &target, &["T"], &mut subst));
        assert_eq!(subst.get("T"), Some(&GenericArg::Type(param("T"))));
    }

    #[test]
    fn repeated_params_must_agree() {
        let pattern = Ty::Tuple(vec![param("T"), param("T")]);
        let mixed = Ty::Tuple(vec![Ty::Builtin(BuiltinType::U8), Ty::Builtin(BuiltinType::I32)]);
        assert!(!unify(&pattern, &mixed, &["T"], &mut Substitution::new()));
    }

    #[test]
    fn lifetimes_bind_but_never_mismatch() {
        let pattern = Ty::Ref {
            lifetime: Some("'a".into()),
            mutable: false,
            inner: Box::new(param("T")),
        };
        let target = Ty::Ref {
            lifetime: None,
            mutable: false,
            inner: Box::new(Ty::Builtin(BuiltinType::Str)),
        };
        let mut subst = Substitution::new();
        assert!(unify(&pattern, &target, &["'a", "T"], &mut subst));
        assert_eq!(subst.get("'a"), Some(&GenericArg::Lifetime("'_".into())));

        let mutable = Ty::Ref {
            lifetime: None,
            mutable: true,
            inner: Box::new(Ty::Builtin(BuiltinType::Str)),
        };
        assert!(!unify(&pattern, &mutable, &["'a", "T"], &mut Substitution::new()));
    }
}
