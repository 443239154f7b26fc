//! Arena indices into a `DefMap`.

use std::fmt;

macro_rules! arena_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub u32);

            impl $name {
                pub fn index(self) -> usize {
                    self.0 as usize
                }

                pub(crate) fn from_index(index: usize) -> Self {
                    $name(index as u32)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}#{}", stringify!($name), self.0)
                }
            }
        )*
    };
}

arena_id!(
    /// A module, crate roots included
    ModuleId,
    /// A struct or enum
    AdtId,
    TraitId,
    ImplId,
);

/// Anything nameable in the type namespace of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleDef {
    Module(ModuleId),
    Adt(AdtId),
    Trait(TraitId),
}
