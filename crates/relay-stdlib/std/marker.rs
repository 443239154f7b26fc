pub mod marker {
    use crate::clone::Clone;

    pub trait Sized {}

    pub trait Copy: Clone {}

    pub unsafe trait Send {}

    pub unsafe trait Sync {}

    pub trait Unpin {}

    pub struct PhantomData<T: ?Sized>;
}
