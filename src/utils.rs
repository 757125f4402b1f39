#[macro_export]
macro_rules! enum_accessors {
    ($bind:ident $(($variant:ident($ty:ty) $is:ident $get:ident $unwrap:ident $cvt:expr))*) => ($(
        /// Returns whether this value is of the given variant.
        #[inline]
        pub fn $is(&self) -> bool {
            matches!(self, Self::$variant(_))
        }

        /// Attempt to access the underlying value, returning `None` if it
        /// is not the correct variant.
        #[inline]
        pub fn $get(&self) -> Option<$ty> {
            if let Self::$variant($bind) = self {
                Some($cvt)
            } else {
                None
            }
        }

        /// Returns the underlying value, panicking if it's the wrong
        /// variant.
        ///
        /// # Panics
        ///
        /// Panics if `self` is not of the right variant.
        #[inline]
        pub fn $unwrap(&self) -> $ty {
            self.$get().expect(concat!("expected ", stringify!($ty)))
        }
    )*)
}
