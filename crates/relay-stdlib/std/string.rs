pub mod string {
    use crate::borrow::Borrow;
    use crate::clone::Clone;
    use crate::cmp::{Eq, PartialEq};
    use crate::convert::{AsMut, AsRef, From};
    use crate::default::Default;
    use crate::fmt::{Debug, Display, Error, Formatter};
    use crate::hash::{Hash, Hasher};
    use crate::iter::Extend;
    use crate::ops::{Add, AddAssign, Deref, DerefMut};
    use crate::result::Result;
    use crate::vec::Vec;

    pub struct String {
        vec: Vec<u8>,
    }

    pub trait ToString {
        fn to_string(&self) -> String;
    }

    impl<T: Display + ?Sized> ToString for T {
        fn to_string(&self) -> String {
            loop {}
        }
    }

    impl Deref for String {
        type Target = str;
        fn deref(&self) -> &str {
            loop {}
        }
    }

    impl DerefMut for String {
        fn deref_mut(&mut self) -> &mut str {
            loop {}
        }
    }

    impl Clone for String {
        fn clone(&self) -> Self {
            loop {}
        }
    }

    impl Default for String {
        fn default() -> String {
            loop {}
        }
    }

    impl Display for String {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl Debug for String {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl PartialEq for String {
        fn eq(&self, other: &String) -> bool {
            loop {}
        }
    }

    impl Eq for String {}

    impl Hash for String {
        fn hash<H: Hasher>(&self, hasher: &mut H) {
            loop {}
        }
    }

    impl AsRef<str> for String {
        fn as_ref(&self) -> &str {
            loop {}
        }
    }

    impl AsRef<[u8]> for String {
        fn as_ref(&self) -> &[u8] {
            loop {}
        }
    }

    impl AsMut<str> for String {
        fn as_mut(&mut self) -> &mut str {
            loop {}
        }
    }

    impl Borrow<str> for String {
        fn borrow(&self) -> &str {
            loop {}
        }
    }

    impl From<&str> for String {
        fn from(s: &str) -> String {
            loop {}
        }
    }

    impl Add<&str> for String {
        type Output = String;
        fn add(self, other: &str) -> String {
            loop {}
        }
    }

    impl AddAssign<&str> for String {
        fn add_assign(&mut self, other: &str) {
            loop {}
        }
    }

    impl Extend<char> for String {
        fn extend<I: crate::iter::IntoIterator<Item = char>>(&mut self, iter: I) {
            loop {}
        }
    }
}
