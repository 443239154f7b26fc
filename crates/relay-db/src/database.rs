use relay_source::SourceDatabase;
use relay_syntax::SyntaxDatabase;
use relay_types::TypeDatabase;

/// The database integrating every query group.
#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {
    fn salsa_event(&self, event: &dyn Fn() -> salsa::Event) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("salsa: {:?}", event().kind);
        }
    }
}

macro_rules! impl_query_databases {
    ($($db:ident),*) => {
        $(
            #[salsa::db]
            impl $db for RootDatabase {}
        )*
    };
}

impl_query_databases!(SourceDatabase, SyntaxDatabase, TypeDatabase);
