/// Generates fixed-shift accessors over `self.raw()`.
///
/// ```text
/// impl_field! {
///     pub mod_ = 6, 2, u8;
///     pub w = 3, 1, bool;
/// }
/// ```
#[macro_export]
macro_rules! impl_field {
    ($($(#[$attr:meta])* $vis:vis $name:ident = $pos:expr, $len:expr, $ret:tt;)*) => ($(
        $crate::impl_field!(impl $(#[$attr])* $vis $name, $ret, $pos, $len);
    )*);
    (impl $(#[$attr:meta])* $vis:vis $name:ident, bool, $pos:expr, $len:expr) => (
        $(#[$attr])*
        #[inline]
        $vis fn $name(&self) -> bool {
            $crate::utils::zextract::<u8, u8>(self.raw(), $pos, $len) != 0
        }
    );
    (impl $(#[$attr:meta])* $vis:vis $name:ident, $ret:ty, $pos:expr, $len:expr) => (
        $(#[$attr])*
        #[inline]
        $vis fn $name(&self) -> $ret {
            $crate::utils::zextract::<u8, u8>(self.raw(), $pos, $len) as $ret
        }
    );
}
pub use impl_field;
