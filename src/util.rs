//! Miscellaneous stuff (especially macros) which are used across the project and needed a home

/// Generate by-value builder methods.
///
/// Each line is `method(param: Type, ...) => field = expression`; the parameter list is optional, for setters that
/// just flip something to a fixed value.
macro_rules! setters {
    ( $(
        $name:ident $( ( $($pname:ident: $ptype:ty),* $(,)? ) )?  => $field:ident = $value:expr
    ),* $(,)? ) => {
        $(
            pub fn $name(mut self $( , $( $pname: $ptype ),* )?) -> Self {
                self.$field = $value;
                self
            }
        )*
    };
}

pub(crate) use setters;
