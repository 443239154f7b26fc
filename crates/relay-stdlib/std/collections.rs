pub mod collections {
    use crate::clone::Clone;
    use crate::default::Default;
    use crate::fmt::{Debug, Error, Formatter};
    use crate::iter::{Extend, IntoIterator};
    use crate::ops::Index;
    use crate::result::Result;

    pub struct HashMap<K, V> {
        table: crate::vec::Vec<(K, V)>,
    }

    impl<K, V> Default for HashMap<K, V> {
        fn default() -> HashMap<K, V> {
            loop {}
        }
    }

    impl<K: Clone, V: Clone> Clone for HashMap<K, V> {
        fn clone(&self) -> Self {
            loop {}
        }
    }

    impl<K: Debug, V: Debug> Debug for HashMap<K, V> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl<K, V> Extend<(K, V)> for HashMap<K, V> {
        fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
            loop {}
        }
    }

    impl<K, V> Index<&K> for HashMap<K, V> {
        type Output = V;
        fn index(&self, key: &K) -> &V {
            loop {}
        }
    }
}
