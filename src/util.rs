/// Debug-asserts that a numerical value is finite and panics with a helpful message if not
///
/// ### Example
/// ```ignore
/// let weight = f64::NAN;
/// debug_assert_finite!(weight);
/// ```
/// In debug builds this will panic with the message "Invalid value for \`weight\`. Must be finite, found NaN."
#[macro_export]
macro_rules! debug_assert_finite {
    ($var:expr) => {
        debug_assert!(
            $var.is_finite(),
            "Invalid value for `{}`. Must be finite, found {}.",
            stringify!($var),
            $var,
        );
    };
}
