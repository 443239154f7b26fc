//! Trait impls for primitive, `str` and slice types.

use crate::clone::Clone;
use crate::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd};
use crate::convert::AsRef;
use crate::default::Default;
use crate::fmt::{Debug, Display, Error, Formatter};
use crate::hash::{Hash, Hasher};
use crate::iter::Iterator;
use crate::ops::{Add, Index, IndexMut, Neg};
use crate::option::Option;
use crate::result::Result;

impl Clone for i32 {
    fn clone(&self) -> i32 {
        *self
    }
}

impl Default for i32 {
    fn default() -> i32 {
        0
    }
}

impl Display for i32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Debug for i32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl PartialEq for i32 {
    fn eq(&self, other: &i32) -> bool {
        loop {}
    }
}

impl Eq for i32 {}

impl PartialOrd for i32 {
    fn partial_cmp(&self, other: &i32) -> Option<Ordering> {
        loop {}
    }
}

impl Ord for i32 {
    fn cmp(&self, other: &i32) -> Ordering {
        loop {}
    }
}

impl Hash for i32 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        loop {}
    }
}

impl Add for i32 {
    type Output = i32;
    fn add(self, rhs: i32) -> i32 {
        loop {}
    }
}

impl Neg for i32 {
    type Output = i32;
    fn neg(self) -> i32 {
        -self
    }
}

impl Clone for u8 {
    fn clone(&self) -> u8 {
        *self
    }
}

impl Display for u8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Debug for u8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl PartialEq for u8 {
    fn eq(&self, other: &u8) -> bool {
        loop {}
    }
}

impl Display for usize {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Debug for usize {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Add for usize {
    type Output = usize;
    fn add(self, rhs: usize) -> usize {
        loop {}
    }
}

impl Display for bool {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Debug for bool {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Display for str {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl Debug for str {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl PartialEq for str {
    fn eq(&self, other: &str) -> bool {
        loop {}
    }
}

impl AsRef<[u8]> for str {
    fn as_ref(&self) -> &[u8] {
        loop {}
    }
}

impl<T> Index<usize> for [T] {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        loop {}
    }
}

impl<T> IndexMut<usize> for [T] {
    fn index_mut(&mut self, index: usize) -> &mut T {
        loop {}
    }
}

impl<T: Debug> Debug for [T] {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        loop {}
    }
}

impl<T> AsRef<[T]> for [T] {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<I: Iterator + ?Sized> Iterator for &mut I {
    type Item = I::Item;
    fn next(&mut self) -> Option<I::Item> {
        loop {}
    }
}
