pub mod clone {
    pub trait Clone: Sized {
        fn clone(&self) -> Self;

        fn clone_from(&mut self, source: &Self) {
            *self = source.clone()
        }
    }
}

pub mod default {
    pub trait Default: Sized {
        fn default() -> Self;
    }
}
