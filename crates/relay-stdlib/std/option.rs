pub mod option {
    use crate::clone::Clone;
    use crate::cmp::PartialEq;
    use crate::default::Default;
    use crate::fmt::{Debug, Error, Formatter};
    use crate::hash::{Hash, Hasher};
    use crate::result::Result;

    pub enum Option<T> {
        None,
        Some(T),
    }

    impl<T: Clone> Clone for Option<T> {
        fn clone(&self) -> Self {
            loop {}
        }
    }

    impl<T> Default for Option<T> {
        fn default() -> Option<T> {
            Option::None
        }
    }

    impl<T: Debug> Debug for Option<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl<T: PartialEq> PartialEq for Option<T> {
        fn eq(&self, other: &Self) -> bool {
            loop {}
        }
    }

    impl<T: Hash> Hash for Option<T> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            loop {}
        }
    }
}

pub mod result {
    pub enum Result<T, E> {
        Ok(T),
        Err(E),
    }
}
