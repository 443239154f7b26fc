pub mod boxed {
    use crate::clone::Clone;
    use crate::default::Default;
    use crate::fmt::{Debug, Display, Error, Formatter};
    use crate::iter::Iterator;
    use crate::ops::{Deref, DerefMut};
    use crate::option::Option;
    use crate::result::Result;

    pub struct Box<T: ?Sized> {
        ptr: *mut T,
    }

    impl<T: ?Sized> Deref for Box<T> {
        type Target = T;
        fn deref(&self) -> &T {
            loop {}
        }
    }

    impl<T: ?Sized> DerefMut for Box<T> {
        fn deref_mut(&mut self) -> &mut T {
            loop {}
        }
    }

    impl<T: Clone> Clone for Box<T> {
        fn clone(&self) -> Self {
            loop {}
        }
    }

    impl<T: Default> Default for Box<T> {
        fn default() -> Self {
            loop {}
        }
    }

    impl<T: ?Sized + Display> Display for Box<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl<T: ?Sized + Debug> Debug for Box<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl<I: Iterator + ?Sized> Iterator for Box<I> {
        type Item = I::Item;
        fn next(&mut self) -> Option<I::Item> {
            loop {}
        }
    }
}

pub mod rc {
    use crate::clone::Clone;
    use crate::marker::Send;
    use crate::ops::Deref;

    pub struct Rc<T: ?Sized> {
        ptr: *const T,
    }

    impl<T: ?Sized> Deref for Rc<T> {
        type Target = T;
        fn deref(&self) -> &T {
            loop {}
        }
    }

    impl<T: ?Sized> Clone for Rc<T> {
        fn clone(&self) -> Self {
            loop {}
        }
    }

    impl<T: ?Sized> !Send for Rc<T> {}
}

pub mod sync {
    use crate::clone::Clone;
    use crate::ops::Deref;

    pub struct Arc<T: ?Sized> {
        ptr: *const T,
    }

    impl<T: ?Sized> Deref for Arc<T> {
        type Target = T;
        fn deref(&self) -> &T {
            loop {}
        }
    }

    impl<T: ?Sized> Clone for Arc<T> {
        fn clone(&self) -> Self {
            loop {}
        }
    }
}
