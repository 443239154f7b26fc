pub mod vec {
    use crate::borrow::Borrow;
    use crate::clone::Clone;
    use crate::cmp::{Eq, PartialEq};
    use crate::convert::{AsMut, AsRef};
    use crate::default::Default;
    use crate::fmt::{Debug, Error, Formatter};
    use crate::hash::{Hash, Hasher};
    use crate::iter::{Extend, IntoIterator, Iterator};
    use crate::ops::{Deref, DerefMut, Index, IndexMut};
    use crate::option::Option;
    use crate::result::Result;

    pub struct Vec<T> {
        ptr: *mut T,
        len: usize,
        cap: usize,
    }

    pub struct IntoIter<T> {
        buf: *const T,
    }

    impl<T> Iterator for IntoIter<T> {
        type Item = T;
        fn next(&mut self) -> Option<T> {
            loop {}
        }
    }

    impl<T> Deref for Vec<T> {
        type Target = [T];
        fn deref(&self) -> &[T] {
            loop {}
        }
    }

    impl<T> DerefMut for Vec<T> {
        fn deref_mut(&mut self) -> &mut [T] {
            loop {}
        }
    }

    impl<T: Clone> Clone for Vec<T> {
        fn clone(&self) -> Self {
            loop {}
        }
    }

    impl<T> Default for Vec<T> {
        fn default() -> Vec<T> {
            loop {}
        }
    }

    impl<T: Debug> Debug for Vec<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl<T, U> PartialEq<Vec<U>> for Vec<T>
    where
        T: PartialEq<U>,
    {
        fn eq(&self, other: &Vec<U>) -> bool {
            loop {}
        }
    }

    impl<T: Eq> Eq for Vec<T> {}

    impl<T: Hash> Hash for Vec<T> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            loop {}
        }
    }

    impl<T> Index<usize> for Vec<T> {
        type Output = T;
        fn index(&self, index: usize) -> &T {
            loop {}
        }
    }

    impl<T> IndexMut<usize> for Vec<T> {
        fn index_mut(&mut self, index: usize) -> &mut T {
            loop {}
        }
    }

    impl<T> IntoIterator for Vec<T> {
        type Item = T;
        type IntoIter = IntoIter<T>;
        fn into_iter(self) -> IntoIter<T> {
            loop {}
        }
    }

    impl<T> Extend<T> for Vec<T> {
        fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
            loop {}
        }
    }

    impl<T> AsRef<[T]> for Vec<T> {
        fn as_ref(&self) -> &[T] {
            loop {}
        }
    }

    impl<T> AsMut<[T]> for Vec<T> {
        fn as_mut(&mut self) -> &mut [T] {
            loop {}
        }
    }

    impl<T> Borrow<[T]> for Vec<T> {
        fn borrow(&self) -> &[T] {
            loop {}
        }
    }
}
