use std::{
  cell::{Ref, RefCell, RefMut},
  rc::Rc,
};

/// Shared mutable cell for the crate's single-threaded handles.
///
/// Every public handle in this crate (`Observer`, `Subject`, `Queued`, ...)
/// is a cheap clone of a `MutRc` around its real state, so cloning a handle
/// never duplicates the state it controls.
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Default> Default for MutRc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shares_state_across_clones() {
    let a = MutRc::own(1);
    let b = a.clone();
    *b.rc_deref_mut() = 5;
    assert_eq!(*a.rc_deref(), 5);
    assert!(a.ptr_eq(&b));
  }
}
