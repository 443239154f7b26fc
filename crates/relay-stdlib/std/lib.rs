//! Item-level model of the standard library. Only signatures matter here;
//! bodies exist so the files stay valid Rust.

pub mod prelude {
    pub use crate::borrow::ToOwned;
    pub use crate::boxed::Box;
    pub use crate::clone::Clone;
    pub use crate::cmp::{Eq, Ord, PartialEq, PartialOrd};
    pub use crate::convert::{AsMut, AsRef, From, Into};
    pub use crate::default::Default;
    pub use crate::iter::{Extend, IntoIterator, Iterator};
    pub use crate::marker::{Copy, Send, Sized, Sync, Unpin};
    pub use crate::ops::Drop;
    pub use crate::option::Option;
    pub use crate::result::Result;
    pub use crate::string::{String, ToString};
    pub use crate::vec::Vec;
}
