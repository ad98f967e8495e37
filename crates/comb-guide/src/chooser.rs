//! The chooser and guide traits.

/// Source of bounded nondeterministic decisions for one attempt.
pub trait Chooser {
    /// Resolve the next decision among `n` options, returning a value in
    /// `0..n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    fn choose(&mut self, n: usize) -> usize;

    /// Every answer given so far, in order.
    fn choices(&self) -> &[usize];
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, n: usize) -> usize {
        (**self).choose(n)
    }

    fn choices(&self) -> &[usize] {
        (**self).choices()
    }
}

/// Produces choosers until its decision space is exhausted.
pub trait Guide {
    type Chooser<'a>: Chooser
    where
        Self: 'a;

    /// The next chooser, or `None` once there is nothing left to hand out.
    fn make_chooser(&mut self) -> Option<Self::Chooser<'_>>;
}
